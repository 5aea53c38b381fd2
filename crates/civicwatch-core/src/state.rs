//! Application state: the canonical collection plus the active filter criteria.

use tracing::info;

use crate::query::{FilterCriteria, SortKey, apply_filters};
use crate::types::{AlertBand, Bill, Dashboard, Deputy, DeputyId, GlobalStats, PartyStats};

/// Owns the data of the current load cycle and the filter criteria.
///
/// There is one mutator path per concern: [`replace`](Self::replace) swaps
/// the loaded data wholesale, and the `set_*` methods change criteria. The
/// view is never stored; [`view`](Self::view) derives it on every call.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    data: Dashboard,
    criteria: FilterCriteria,
}

impl AppState {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            data: Dashboard::default(),
            criteria,
        }
    }

    /// Replace everything from a finished load cycle. No merging.
    pub fn replace(&mut self, data: Dashboard) {
        info!(
            deputies = data.deputies.len(),
            alerts = data.alerts.len(),
            parties = data.party_stats.len(),
            bills = data.upcoming_bills.len(),
            "state replaced"
        );
        self.data = data;
    }

    // ── Accessors ──

    pub fn collection(&self) -> &[Deputy] {
        &self.data.deputies
    }

    pub fn stats(&self) -> &GlobalStats {
        &self.data.stats
    }

    pub fn party_stats(&self) -> &[PartyStats] {
        &self.data.party_stats
    }

    pub fn alerts(&self) -> &[Deputy] {
        &self.data.alerts
    }

    pub fn upcoming_bills(&self) -> &[Bill] {
        &self.data.upcoming_bills
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    // ── Criteria mutators ──

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
    }

    /// `None` or an empty code clears the party filter.
    pub fn set_party(&mut self, code: Option<String>) {
        self.criteria.party_code = code.filter(|c| !c.is_empty());
    }

    pub fn set_alert_band(&mut self, band: Option<AlertBand>) {
        self.criteria.alert_band = band;
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.criteria.sort_key = key;
    }

    /// Drop every filter but keep the current sort.
    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria {
            sort_key: self.criteria.sort_key,
            ..Default::default()
        };
    }

    // ── Derived ──

    /// The current view, recomputed from the collection and criteria.
    pub fn view(&self) -> Vec<&Deputy> {
        apply_filters(&self.data.deputies, &self.criteria)
    }

    /// Look a deputy up by id in the collection, then in the alert list.
    pub fn find_by_id(&self, id: &DeputyId) -> Option<&Deputy> {
        self.data
            .deputies
            .iter()
            .chain(&self.data.alerts)
            .find(|d| &d.id == id)
    }

    /// `(code, name)` pairs for a party selector, in party-stats order.
    pub fn party_options(&self) -> Vec<(&str, &str)> {
        self.data
            .party_stats
            .iter()
            .map(|p| (p.code.as_str(), p.name.as_str()))
            .collect()
    }
}
