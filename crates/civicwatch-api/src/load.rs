//! The dashboard load cycle: five concurrent fetches joined into one [`Dashboard`].

use chrono::{DateTime, Utc};
use civicwatch_core::Dashboard;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::client::{ApiClient, Endpoint, Source};

/// Provenance of one endpoint within a load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointStatus {
    pub endpoint: Endpoint,
    pub source: Source,
}

/// Per-endpoint outcome of a load cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub fetched_at: DateTime<Utc>,
    pub endpoints: Vec<EndpointStatus>,
}

impl LoadReport {
    /// Endpoints whose data is synthetic.
    pub fn fallback_endpoints(&self) -> Vec<Endpoint> {
        self.endpoints
            .iter()
            .filter(|s| s.source.is_fallback())
            .map(|s| s.endpoint)
            .collect()
    }

    /// True when live and synthetic data were combined in one cycle.
    pub fn is_mixed(&self) -> bool {
        let fallbacks = self.fallback_endpoints().len();
        fallbacks > 0 && fallbacks < self.endpoints.len()
    }

    pub fn is_fully_live(&self) -> bool {
        self.endpoints.iter().all(|s| s.source == Source::Live)
    }
}

/// Result of one load cycle.
#[derive(Debug, Clone)]
pub struct LoadCycle {
    pub dashboard: Dashboard,
    pub report: LoadReport,
}

impl ApiClient {
    /// Run one load cycle.
    ///
    /// All five dashboard endpoints are requested concurrently, each with its
    /// own child of `cancel`. A failure in one endpoint substitutes that
    /// endpoint's fallback data and does not affect its siblings.
    pub async fn load(&self, cancel: &CancellationToken) -> LoadCycle {
        let (c1, c2, c3, c4, c5) = (
            cancel.child_token(),
            cancel.child_token(),
            cancel.child_token(),
            cancel.child_token(),
            cancel.child_token(),
        );
        let (deputies, stats, party_stats, alerts, bills) = tokio::join!(
            self.fetch_deputies(&c1),
            self.fetch_stats(&c2),
            self.fetch_party_stats(&c3),
            self.fetch_alerts(&c4),
            self.fetch_upcoming_bills(&c5),
        );

        let report = LoadReport {
            fetched_at: Utc::now(),
            endpoints: vec![
                EndpointStatus {
                    endpoint: Endpoint::Deputies,
                    source: deputies.source,
                },
                EndpointStatus {
                    endpoint: Endpoint::Stats,
                    source: stats.source,
                },
                EndpointStatus {
                    endpoint: Endpoint::PartyStats,
                    source: party_stats.source,
                },
                EndpointStatus {
                    endpoint: Endpoint::Alerts,
                    source: alerts.source,
                },
                EndpointStatus {
                    endpoint: Endpoint::UpcomingBills,
                    source: bills.source,
                },
            ],
        };

        if report.is_mixed() {
            let fallbacks: Vec<&str> = report
                .fallback_endpoints()
                .iter()
                .map(Endpoint::action)
                .collect();
            warn!(
                fallbacks = ?fallbacks,
                "load cycle mixes live and fallback data"
            );
        }

        let dashboard = Dashboard {
            deputies: deputies.value,
            stats: stats.value,
            party_stats: party_stats.value,
            alerts: alerts.value,
            upcoming_bills: bills.value,
        };
        info!(
            deputies = dashboard.deputies.len(),
            live = report.is_fully_live(),
            "load cycle complete"
        );

        LoadCycle { dashboard, report }
    }
}
