mod args;
mod display;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use civicwatch_api::{ApiClient, ApiConfig, CancellationToken, LoadReport};
use civicwatch_core::{AppState, Deputy, FilterCriteria};

use args::{Args, Command, OutputFormat};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a, T: Serialize> {
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    criteria: Option<&'a FilterCriteria>,
    report: &'a LoadReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("civicwatch v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = ApiConfig {
        fallback_seed: args.seed,
        ..Default::default()
    }
    .with_timeout(Duration::from_secs(args.timeout_secs))
    .offline(args.offline);
    if let Some(url) = &args.api_url {
        config = config.with_base_url(url.clone());
    }
    let client = ApiClient::new(config)?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling in-flight requests");
            on_ctrl_c.cancel();
        }
    });

    let cycle = client.load(&cancel).await;
    let mut state = AppState::default();
    state.replace(cycle.dashboard);
    let report = cycle.report;

    match args.command {
        Command::Deputies {
            search,
            party,
            alert,
            sort,
            limit,
        } => {
            if let Some(text) = search {
                state.set_search(text);
            }
            state.set_party(party);
            state.set_alert_band(alert);
            state.set_sort(sort);
            let view = state.view();
            match args.format {
                OutputFormat::Text => {
                    print!(
                        "{}",
                        display::render_deputy_list(&view, state.collection().len(), limit)
                    );
                }
                OutputFormat::Json => {
                    let rows: Vec<&Deputy> = view
                        .into_iter()
                        .take(limit.unwrap_or(usize::MAX))
                        .collect();
                    emit_json(&rows, Some(state.criteria()), &report)?;
                }
            }
        }
        Command::Show { id } => {
            let deputy = match state.find_by_id(&id) {
                Some(dep) => Some(dep.clone()),
                None => client.fetch_deputy(&id, &cancel).await.value,
            };
            let Some(deputy) = deputy else {
                eprintln!("deputy {id} not found");
                return Ok(ExitCode::FAILURE);
            };
            match args.format {
                OutputFormat::Text => print!("{}", display::render_deputy_card(&deputy)),
                OutputFormat::Json => emit_json(&deputy, None, &report)?,
            }
        }
        Command::Stats => match args.format {
            OutputFormat::Text => print!("{}", display::render_stats(state.stats())),
            OutputFormat::Json => emit_json(state.stats(), None, &report)?,
        },
        Command::Parties => match args.format {
            OutputFormat::Text => print!("{}", display::render_party_stats(state.party_stats())),
            OutputFormat::Json => emit_json(state.party_stats(), None, &report)?,
        },
        Command::Alerts => match args.format {
            OutputFormat::Text => print!("{}", display::render_alerts(state.alerts())),
            OutputFormat::Json => emit_json(state.alerts(), None, &report)?,
        },
        Command::Bills { all } => {
            let all_bills;
            let bills = if all {
                all_bills = client.fetch_bills(&cancel).await.value;
                all_bills.as_slice()
            } else {
                state.upcoming_bills()
            };
            match args.format {
                OutputFormat::Text => print!("{}", display::render_bills(bills)),
                OutputFormat::Json => emit_json(bills, None, &report)?,
            }
        }
    }

    if args.format == OutputFormat::Text
        && let Some(note) = display::render_source_note(&report)
    {
        eprintln!("{note}");
    }

    Ok(ExitCode::SUCCESS)
}

fn emit_json<T: Serialize>(
    data: T,
    criteria: Option<&FilterCriteria>,
    report: &LoadReport,
) -> anyhow::Result<()> {
    let out = Output {
        data,
        criteria,
        report,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
