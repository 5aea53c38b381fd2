//! Filtered, sorted views over the canonical deputy collection.
//!
//! A view is recomputed in full from the collection and the current
//! [`FilterCriteria`] on every change. The collection itself is never
//! touched; views hold references into it.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collate::locale_cmp;
use crate::error::ParseError;
use crate::types::{AlertBand, Deputy};

/// The single active ordering of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Descending alert level.
    #[default]
    Alert,
    /// Ascending, locale-aware on name.
    Name,
    /// Ascending, locale-aware on party code.
    Party,
    /// Descending attendance.
    Attendance,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Name => "name",
            Self::Party => "party",
            Self::Attendance => "attendance",
        }
    }

    fn compare(&self, a: &Deputy, b: &Deputy) -> Ordering {
        match self {
            Self::Alert => b.alert_level.cmp(&a.alert_level),
            Self::Name => locale_cmp(&a.name, &b.name),
            Self::Party => locale_cmp(&a.party_code, &b.party_code),
            Self::Attendance => b.attendance.cmp(&a.attendance),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alert" => Ok(Self::Alert),
            "name" => Ok(Self::Name),
            "party" => Ok(Self::Party),
            "attendance" => Ok(Self::Attendance),
            other => Err(ParseError::Unknown {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

/// Active filters and ordering. The default has no filters and sorts by alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring over name, party code and party name.
    pub search_text: String,
    /// Exact party code match.
    pub party_code: Option<String>,
    pub alert_band: Option<AlertBand>,
    pub sort_key: SortKey,
}

impl FilterCriteria {
    pub fn is_unfiltered(&self) -> bool {
        self.search_text.is_empty() && self.party_code.is_none() && self.alert_band.is_none()
    }

    /// Whether a deputy passes every active predicate.
    pub fn matches(&self, dep: &Deputy) -> bool {
        self.matches_search(dep) && self.matches_party(dep) && self.matches_band(dep)
    }

    fn matches_search(&self, dep: &Deputy) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        [&dep.name, &dep.party_code, &dep.party_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_party(&self, dep: &Deputy) -> bool {
        self.party_code
            .as_deref()
            .is_none_or(|code| dep.party_code == code)
    }

    fn matches_band(&self, dep: &Deputy) -> bool {
        self.alert_band
            .is_none_or(|band| band.contains(dep.alert_level))
    }
}

/// Derive the view for `criteria` over `deputies`.
///
/// Predicates compose with AND; the sort is stable, so deputies with equal
/// keys keep their collection order.
pub fn apply_filters<'a>(deputies: &'a [Deputy], criteria: &FilterCriteria) -> Vec<&'a Deputy> {
    let mut view: Vec<&Deputy> = deputies.iter().filter(|d| criteria.matches(d)).collect();
    view.sort_by(|a, b| criteria.sort_key.compare(a, b));
    view
}
