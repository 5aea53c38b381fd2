//! Plain-text rendering of dashboard data.
//!
//! Every function returns the rendered text instead of printing it, so the
//! caller decides where it goes and tests can inspect it.

use std::fmt::Write;

use civicwatch_api::LoadReport;
use civicwatch_core::{AlertBand, Bill, Deputy, GlobalStats, PartyStats};

const MAX_LIST_ITEMS: usize = 10;
const MAX_TITLE_CHARS: usize = 80;

// ── Deputy list ──

/// One row per deputy in view order, or an empty-state line.
pub fn render_deputy_list(view: &[&Deputy], total: usize, limit: Option<usize>) -> String {
    if view.is_empty() {
        return "No deputies match the current filters.\n".to_string();
    }

    let shown = limit.map_or(view.len(), |n| n.min(view.len()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<32} {:<8} {:>5} {:<6} {:>6}",
        "ID", "NAME", "PARTY", "ALERT", "BAND", "ATTEND"
    );
    for dep in &view[..shown] {
        let _ = writeln!(
            out,
            "{:<14} {:<32} {:<8} {:>5} {:<6} {:>5}%",
            dep.id.to_string(),
            truncate(&dep.name, 32),
            dep.party_code,
            dep.alert_level,
            band_label(dep.alert_band()),
            dep.attendance
        );
    }
    if shown < view.len() {
        let _ = writeln!(out, "... and {} more", view.len() - shown);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{} of {} deputies", view.len(), total);
    out
}

// ── Deputy card ──

/// A single deputy as a vertical card grouped by section.
pub fn render_deputy_card(dep: &Deputy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", dep.name);
    let _ = writeln!(out, "{} ({})", dep.party_name, dep.party_code);
    let _ = writeln!(out);

    section(&mut out, "Identity");
    field(&mut out, "id", &dep.id.to_string());
    field(&mut out, "party_code", &dep.party_code);
    field(&mut out, "party_name", &dep.party_name);
    field(&mut out, "party_color", &dep.party_color);
    if !dep.region.is_empty() {
        field(&mut out, "region", &dep.region);
    }

    section(&mut out, "Scores");
    field(
        &mut out,
        "alert_level",
        &format!("{} ({})", dep.alert_level, band_label(dep.alert_band())),
    );
    field(&mut out, "attendance", &format!("{}%", dep.attendance));

    section(&mut out, "Votes");
    field(&mut out, "total_votes", &dep.total_votes.to_string());
    field(&mut out, "votes_for", &dep.votes_for.to_string());
    field(&mut out, "votes_against", &dep.votes_against.to_string());
    field(&mut out, "abstentions", &dep.abstentions.to_string());

    if !dep.social_links.is_empty() {
        section(&mut out, "Social");
        let links = &dep.social_links;
        for (label, value) in [
            ("twitter", &links.twitter),
            ("instagram", &links.instagram),
            ("email", &links.email),
        ] {
            if !value.is_empty() {
                field(&mut out, label, value);
            }
        }
    }

    if !dep.inconsistencies.is_empty() {
        section(&mut out, "Inconsistencies");
        list(&mut out, dep.inconsistencies.iter().map(String::as_str));
    }

    if !dep.voting_history.is_empty() {
        section(&mut out, "Voting History");
        let rows: Vec<String> = dep
            .voting_history
            .iter()
            .map(|v| format!("{:<10} {:<8} {}", v.date, v.vote.as_str(), v.title))
            .collect();
        list(&mut out, rows.iter().map(String::as_str));
    }

    out
}

// ── Aggregates ──

pub fn render_stats(stats: &GlobalStats) -> String {
    let mut out = String::new();
    section(&mut out, "Global Statistics");
    field(&mut out, "total_deputies", &stats.total_deputies.to_string());
    field(&mut out, "high_alerts", &stats.high_alerts.to_string());
    field(&mut out, "medium_alerts", &stats.medium_alerts.to_string());
    field(&mut out, "votes_analyzed", &stats.votes_analyzed.to_string());
    field(
        &mut out,
        "average_attendance",
        &format!("{}%", stats.average_attendance),
    );
    if let Some(updated) = &stats.last_updated {
        field(&mut out, "last_updated", updated);
    }
    out
}

pub fn render_party_stats(parties: &[PartyStats]) -> String {
    if parties.is_empty() {
        return "No party statistics available.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<40} {:>7} {:>9}",
        "CODE", "NAME", "MEMBERS", "AVG ALERT"
    );
    for p in parties {
        let _ = writeln!(
            out,
            "{:<8} {:<40} {:>7} {:>9.1}",
            p.code,
            truncate(&p.name, 40),
            p.count,
            p.average_alert
        );
    }
    out
}

/// The alert list keeps its source order.
pub fn render_alerts(alerts: &[Deputy]) -> String {
    if alerts.is_empty() {
        return "No active alerts.\n".to_string();
    }
    let mut out = String::new();
    for dep in alerts {
        let _ = writeln!(
            out,
            "[{:>2}] {:<6} {} ({})",
            dep.alert_level,
            band_label(dep.alert_band()),
            dep.name,
            dep.party_code
        );
        if let Some(first) = dep.inconsistencies.first() {
            let _ = writeln!(out, "     {}", truncate(first, MAX_TITLE_CHARS));
        }
    }
    out
}

pub fn render_bills(bills: &[Bill]) -> String {
    if bills.is_empty() {
        return "No bills scheduled.\n".to_string();
    }
    let mut out = String::new();
    for bill in bills {
        let _ = writeln!(out, "Boletín {}", bill.bulletin);
        let _ = writeln!(out, "  {}", truncate(&bill.title, MAX_TITLE_CHARS));
        field(&mut out, "topic", &bill.topic);
        if let Some(p) = bill.priority {
            field(&mut out, "priority", p.as_str());
        }
        if let Some(i) = bill.citizen_impact {
            field(&mut out, "citizen_impact", i.as_str());
        }
        if !bill.url.is_empty() {
            field(&mut out, "url", &bill.url);
        }
    }
    out
}

/// Footer naming the endpoints that were served from synthetic data.
pub fn render_source_note(report: &LoadReport) -> Option<String> {
    let fallbacks = report.fallback_endpoints();
    if fallbacks.is_empty() {
        return None;
    }
    let names: Vec<&str> = fallbacks.iter().map(|e| e.action()).collect();
    let note = if report.is_mixed() {
        format!("note: synthetic data used for {}", names.join(", "))
    } else {
        "note: showing synthetic data (live API unavailable)".to_string()
    };
    Some(note)
}

// ── Helpers ──

fn band_label(band: AlertBand) -> &'static str {
    match band {
        AlertBand::High => "HIGH",
        AlertBand::Medium => "MEDIUM",
        AlertBand::Low => "LOW",
    }
}

fn section(out: &mut String, header: &str) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{header}");
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<26} {value}");
}

fn list<'a>(out: &mut String, items: impl ExactSizeIterator<Item = &'a str>) {
    let len = items.len();
    for item in items.take(MAX_LIST_ITEMS) {
        let _ = writeln!(out, "    - {item}");
    }
    if len > MAX_LIST_ITEMS {
        let _ = writeln!(out, "    ... and {} more", len - MAX_LIST_ITEMS);
    }
}

/// Cut to `max` chars, appending "..." when shortened. Char-safe.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
