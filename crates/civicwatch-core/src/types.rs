//! Canonical dashboard types shared between the API client and the CLI.
//!
//! Every type serialises with camelCase field names. A serialised canonical
//! record is itself valid Normalizer input, so normalising twice is a no-op.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Stable deputy identifier, either assigned by the source or derived from content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeputyId {
    Num(i64),
    Text(String),
}

impl fmt::Display for DeputyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for DeputyId {
    type Err = ParseError;

    /// Canonical integer text ("1054", not "01054" or "+1054") becomes `Num`,
    /// anything else non-empty becomes `Text`. `Display` round-trips.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty("deputy id"));
        }
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Num(n),
            _ => Self::Text(s.to_string()),
        })
    }
}

/// A single roll-call position, restricted to a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Favor,
    Against,
    Abstain,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favor => "favor",
            Self::Against => "against",
            Self::Abstain => "abstain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub title: String,
    pub vote: Vote,
    pub date: String,
}

/// Contact handles. An empty string means the handle is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub twitter: String,
    pub instagram: String,
    pub email: String,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.twitter.is_empty() && self.instagram.is_empty() && self.email.is_empty()
    }
}

/// Canonical deputy record.
///
/// Invariants upheld by the Normalizer: `alert_level` in `0..=10`,
/// `attendance` in `0..=100`, and every vote in the closed [`Vote`] set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deputy {
    pub id: DeputyId,
    pub name: String,
    pub party_code: String,
    pub party_name: String,
    pub party_color: String,
    pub region: String,
    pub alert_level: u8,
    pub attendance: u8,
    pub total_votes: u32,
    pub votes_for: u32,
    pub votes_against: u32,
    pub abstentions: u32,
    pub social_links: SocialLinks,
    pub inconsistencies: Vec<String>,
    pub voting_history: Vec<VoteRecord>,
}

impl Deputy {
    pub fn alert_band(&self) -> AlertBand {
        AlertBand::of(self.alert_level)
    }
}

/// Risk band over the alert score. The three bands partition `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertBand {
    Low,
    Medium,
    High,
}

impl AlertBand {
    /// `High` at 7 and above, `Medium` from 4 to 6, `Low` below 4.
    pub fn of(level: u8) -> Self {
        match level {
            7.. => Self::High,
            4..=6 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn contains(&self, level: u8) -> bool {
        Self::of(level) == *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for AlertBand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseError::Unknown {
                kind: "alert band",
                value: other.to_string(),
            }),
        }
    }
}

/// Aggregate counters from the global statistics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_deputies: u32,
    pub high_alerts: u32,
    pub medium_alerts: u32,
    pub votes_analyzed: u32,
    pub average_attendance: u32,
    /// ISO 8601 timestamp as reported by the source, if any.
    pub last_updated: Option<String>,
}

/// Per-party summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyStats {
    pub code: String,
    pub name: String,
    pub color: String,
    pub count: u32,
    pub average_alert: f64,
}

/// Three-step scale used for bill priority and citizen impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    /// Accepts the backend's Spanish labels as well as the English names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "alto" | "alta" | "high" => Some(Self::High),
            "medio" | "media" | "medium" => Some(Self::Medium),
            "bajo" | "baja" | "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A pending bill on the legislative agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bulletin: String,
    pub title: String,
    pub topic: String,
    pub priority: Option<Level>,
    pub citizen_impact: Option<Level>,
    pub url: String,
}

/// Everything one load cycle produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub deputies: Vec<Deputy>,
    pub stats: GlobalStats,
    pub party_stats: Vec<PartyStats>,
    pub alerts: Vec<Deputy>,
    pub upcoming_bills: Vec<Bill>,
}
