use clap::{Parser, Subcommand, ValueEnum};

use civicwatch_core::{AlertBand, DEFAULT_SEED, DeputyId, SortKey};

#[derive(Debug, Parser)]
#[command(
    name = "civicwatch",
    version,
    about = "Legislative activity monitor: deputies, alerts, party statistics and pending bills"
)]
pub struct Args {
    /// Backend web-app URL (ends in /exec)
    #[arg(long, env = "CIVICWATCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Serve everything from the built-in synthetic data
    #[arg(long, env = "CIVICWATCH_OFFLINE", global = true)]
    pub offline: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15, global = true)]
    pub timeout_secs: u64,

    /// Seed for the synthetic fallback data
    #[arg(long, default_value_t = DEFAULT_SEED, global = true)]
    pub seed: u64,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List deputies, filtered and sorted
    Deputies {
        /// Case-insensitive match on name, party code or party name
        #[arg(long)]
        search: Option<String>,

        /// Exact party code (e.g. PS, RN)
        #[arg(long)]
        party: Option<String>,

        /// Alert band: low, medium or high
        #[arg(long)]
        alert: Option<AlertBand>,

        /// Sort key: alert, name, party or attendance
        #[arg(long, default_value = "alert")]
        sort: SortKey,

        /// Show at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the full profile of one deputy
    Show {
        /// Deputy id as listed by `deputies`
        id: DeputyId,
    },
    /// Global statistics
    Stats,
    /// Per-party statistics
    Parties,
    /// Deputies with the highest alert scores
    Alerts,
    /// Upcoming high-priority bills
    Bills {
        /// List every tracked bill, not only upcoming ones
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
