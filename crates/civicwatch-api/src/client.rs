//! HTTP client for the legislative-activity backend.
//!
//! Every endpoint is served from one web-app URL and selected with
//! `?page=api&action=<endpoint>`. A failed fetch never surfaces as an error:
//! it is logged and replaced by that endpoint's synthetic fallback data.

use std::fmt;

use civicwatch_core::normalize::upstream_error;
use civicwatch_core::{
    Bill, Deputy, DeputyId, FallbackSource, GlobalStats, PartyStats, normalize_bills,
    normalize_deputies, normalize_deputy, normalize_party_stats, normalize_stats,
};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::FetchError;

/// Backend actions understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Endpoint {
    Deputies,
    Stats,
    PartyStats,
    Alerts,
    UpcomingBills,
    Bills,
    DeputyDetail,
}

impl Endpoint {
    /// Value of the `action` query parameter.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Deputies => "diputados",
            Self::Stats => "estadisticas",
            Self::PartyStats => "estadisticasPartido",
            Self::Alerts => "alertas",
            Self::UpcomingBills => "proximasVotaciones",
            Self::Bills => "proyectosLey",
            Self::DeputyDetail => "diputadoDetalle",
        }
    }
}

impl From<Endpoint> for &'static str {
    fn from(e: Endpoint) -> Self {
        e.action()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Where a fetched value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Source {
    Live,
    Fallback { reason: String },
}

impl Source {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// A normalised endpoint result tagged with its provenance.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

/// Client for the backend's single web-app URL.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Option<Url>,
    config: ApiConfig,
    fallback: FallbackSource,
}

impl ApiClient {
    /// Create a client. Fails only on an unparseable URL or a TLS backend
    /// that cannot initialise.
    ///
    /// Trailing slashes are trimmed from the base URL.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let base_url = match config.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                let trimmed = url.trim_end_matches('/');
                Some(Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
                    url: trimmed.to_string(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };
        let fallback = FallbackSource::new(config.fallback_seed);
        Ok(Self {
            client,
            base_url,
            config,
            fallback,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn fallback(&self) -> &FallbackSource {
        &self.fallback
    }

    /// Whether requests go to the network at all.
    pub fn is_live(&self) -> bool {
        !self.config.offline && self.base_url.is_some()
    }

    /// Full request URL for an endpoint, or `None` when live fetching is off.
    pub fn endpoint_url(&self, endpoint: Endpoint, params: &[(&str, String)]) -> Option<Url> {
        if self.config.offline {
            return None;
        }
        let mut url = self.base_url.clone()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", "api");
            query.append_pair("action", endpoint.action());
            for (k, v) in params {
                query.append_pair(k, v);
            }
        }
        Some(url)
    }

    /// Issue one request and return the raw JSON body.
    ///
    /// Bounded by the configured timeout and by `cancel`. Upstream
    /// `{"error": ...}` payloads are reported as [`FetchError::Upstream`].
    pub async fn fetch_raw(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<Value, FetchError> {
        let url = self
            .endpoint_url(endpoint, params)
            .ok_or(FetchError::Disabled)?;

        info!(endpoint = %endpoint, "fetching from API");
        let request = async {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(FetchError::Server {
                    status: status.as_u16(),
                    body,
                });
            }
            let bytes = resp.bytes().await?;
            let value: Value = serde_json::from_slice(&bytes)?;
            if let Some(message) = upstream_error(&value) {
                return Err(FetchError::Upstream(message));
            }
            Ok::<Value, FetchError>(value)
        };

        let timeout = self.config.timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            res = tokio::time::timeout(timeout, request) => match res {
                Ok(Err(FetchError::Http(e))) if e.is_timeout() => Err(FetchError::Timeout(timeout)),
                Ok(inner) => inner,
                Err(_) => Err(FetchError::Timeout(timeout)),
            },
        }
    }

    /// Fetch and normalise, substituting fallback data on any failure. No retry.
    async fn fetch_or_fallback<T>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        cancel: &CancellationToken,
        normalize: impl Fn(&Value) -> T,
        fallback: impl FnOnce(&FallbackSource) -> Value,
    ) -> Fetched<T> {
        match self.fetch_raw(endpoint, params, cancel).await {
            Ok(raw) => Fetched {
                value: normalize(&raw),
                source: Source::Live,
            },
            Err(e) => {
                if matches!(e, FetchError::Disabled) {
                    debug!(endpoint = %endpoint, "live API disabled, serving fallback data");
                } else {
                    warn!(endpoint = %endpoint, error = %e, "API fetch failed, serving fallback data");
                }
                Fetched {
                    value: normalize(&fallback(&self.fallback)),
                    source: Source::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    pub async fn fetch_deputies(&self, cancel: &CancellationToken) -> Fetched<Vec<Deputy>> {
        self.fetch_or_fallback(
            Endpoint::Deputies,
            &[],
            cancel,
            normalize_deputies,
            FallbackSource::raw_deputies,
        )
        .await
    }

    pub async fn fetch_stats(&self, cancel: &CancellationToken) -> Fetched<GlobalStats> {
        self.fetch_or_fallback(
            Endpoint::Stats,
            &[],
            cancel,
            normalize_stats,
            FallbackSource::raw_stats,
        )
        .await
    }

    pub async fn fetch_party_stats(&self, cancel: &CancellationToken) -> Fetched<Vec<PartyStats>> {
        self.fetch_or_fallback(
            Endpoint::PartyStats,
            &[],
            cancel,
            normalize_party_stats,
            FallbackSource::raw_party_stats,
        )
        .await
    }

    pub async fn fetch_alerts(&self, cancel: &CancellationToken) -> Fetched<Vec<Deputy>> {
        self.fetch_or_fallback(
            Endpoint::Alerts,
            &[],
            cancel,
            normalize_deputies,
            FallbackSource::raw_alerts,
        )
        .await
    }

    pub async fn fetch_upcoming_bills(&self, cancel: &CancellationToken) -> Fetched<Vec<Bill>> {
        self.fetch_or_fallback(
            Endpoint::UpcomingBills,
            &[],
            cancel,
            normalize_bills,
            FallbackSource::raw_upcoming_bills,
        )
        .await
    }

    pub async fn fetch_bills(&self, cancel: &CancellationToken) -> Fetched<Vec<Bill>> {
        self.fetch_or_fallback(
            Endpoint::Bills,
            &[],
            cancel,
            normalize_bills,
            FallbackSource::raw_bills,
        )
        .await
    }

    /// Detail record for one deputy; `None` when the backend has no such id.
    pub async fn fetch_deputy(
        &self,
        id: &DeputyId,
        cancel: &CancellationToken,
    ) -> Fetched<Option<Deputy>> {
        self.fetch_or_fallback(
            Endpoint::DeputyDetail,
            &[("id", id.to_string())],
            cancel,
            |raw| raw.is_object().then(|| normalize_deputy(raw)),
            |src| src.raw_deputy(id),
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub(crate) type Handler = Arc<dyn Fn(&str) -> (u16, String) + Send + Sync>;

    /// Serve canned responses on a local port. The handler receives the
    /// request target (path and query) and returns status and body.
    pub(crate) async fn spawn_server(handler: Handler, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match sock.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&buf);
                    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    tokio::time::sleep(delay).await;
                    let (status, body) = handler(&target);
                    let resp = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(resp.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });
        format!("http://{addr}/exec")
    }

    pub(crate) fn action_of(target: &str) -> String {
        target
            .split(['?', '&'])
            .find_map(|kv| kv.strip_prefix("action="))
            .unwrap_or_default()
            .to_string()
    }

    fn client(url: &str) -> ApiClient {
        ApiClient::new(
            ApiConfig::default()
                .with_base_url(url)
                .with_timeout(Duration::from_millis(500)),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_url_carries_page_and_action() {
        let c = client("http://localhost:4000/exec/");
        let url = c
            .endpoint_url(Endpoint::DeputyDetail, &[("id", "12".into())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/exec?page=api&action=diputadoDetalle&id=12"
        );
    }

    #[test]
    fn offline_or_missing_url_disables_live() {
        let c = ApiClient::new(ApiConfig::default()).unwrap();
        assert!(!c.is_live());
        let c = ApiClient::new(ApiConfig::default().with_base_url("http://x/exec").offline(true))
            .unwrap();
        assert!(!c.is_live());
        assert!(c.endpoint_url(Endpoint::Stats, &[]).is_none());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = ApiClient::new(ApiConfig::default().with_base_url("not a url")).err();
        assert!(matches!(err, Some(FetchError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn live_deputies_are_normalised() {
        let handler: Handler = Arc::new(|target| {
            assert_eq!(action_of(target), "diputados");
            (
                200,
                json!([
                    {"dipId": 7, "nombre": "Jorge Brito", "partido": "FA", "alerta": 6,
                     "votacionesDetalle": [{"proyecto": "Ley 40 Horas", "voto": "Afirmativo"}]},
                    {"id": 8, "nombre": "Flor Weisse", "partido": "RN"},
                ])
                .to_string(),
            )
        });
        let url = spawn_server(handler, Duration::ZERO).await;
        let got = client(&url)
            .fetch_deputies(&CancellationToken::new())
            .await;
        assert_eq!(got.source, Source::Live);
        assert_eq!(got.value.len(), 2);
        assert_eq!(got.value[0].id, DeputyId::Num(7));
        assert_eq!(got.value[0].alert_level, 6);
        assert_eq!(got.value[1].alert_level, 0);
        assert_eq!(
            got.value[0].voting_history[0].vote,
            civicwatch_core::Vote::Favor
        );
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let handler: Handler = Arc::new(|_| (500, "boom".into()));
        let url = spawn_server(handler, Duration::ZERO).await;
        let c = client(&url);
        let got = c.fetch_stats(&CancellationToken::new()).await;
        assert!(got.source.is_fallback());
        assert_eq!(got.value, normalize_stats(&c.fallback().raw_stats()));
        match got.source {
            Source::Fallback { reason } => assert!(reason.contains("500"), "{reason}"),
            Source::Live => unreachable!(),
        }
    }

    #[tokio::test]
    async fn malformed_json_falls_back() {
        let handler: Handler = Arc::new(|_| (200, "{not json".into()));
        let url = spawn_server(handler, Duration::ZERO).await;
        let c = client(&url);
        let got = c.fetch_party_stats(&CancellationToken::new()).await;
        assert!(got.source.is_fallback());
        assert!(!got.value.is_empty());
    }

    #[tokio::test]
    async fn upstream_error_payload_falls_back() {
        let handler: Handler = Arc::new(|_| (200, json!({"error": "sheet missing"}).to_string()));
        let url = spawn_server(handler, Duration::ZERO).await;
        let c = client(&url);
        let err = c
            .fetch_raw(Endpoint::Alerts, &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Upstream(ref m) if m == "sheet missing"));
        assert!(c.fetch_alerts(&CancellationToken::new()).await.source.is_fallback());
    }

    #[tokio::test]
    async fn non_array_live_payload_is_empty_not_fallback() {
        let handler: Handler = Arc::new(|_| (200, json!({"rows": 3}).to_string()));
        let url = spawn_server(handler, Duration::ZERO).await;
        let got = client(&url).fetch_deputies(&CancellationToken::new()).await;
        assert_eq!(got.source, Source::Live);
        assert!(got.value.is_empty());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let handler: Handler = Arc::new(|_| (200, "[]".into()));
        let url = spawn_server(handler, Duration::from_secs(3)).await;
        let c = client(&url);
        let err = c
            .fetch_raw(Endpoint::Deputies, &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)), "{err}");
    }

    #[tokio::test]
    async fn cancelled_request_falls_back() {
        let handler: Handler = Arc::new(|_| (200, "[]".into()));
        let url = spawn_server(handler, Duration::from_secs(3)).await;
        let c = client(&url);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = c
            .fetch_raw(Endpoint::Deputies, &[], &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Cancelled));
        let got = c.fetch_deputies(&cancel).await;
        assert!(got.source.is_fallback());
        assert_eq!(got.value.len(), normalize_deputies(&c.fallback().raw_deputies()).len());
    }

    #[tokio::test]
    async fn closed_port_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let c = client(&format!("http://{addr}/exec"));
        let got = c.fetch_bills(&CancellationToken::new()).await;
        assert!(got.source.is_fallback());
        assert_eq!(got.value.len(), 5);
    }

    #[tokio::test]
    async fn deputy_detail_live_and_missing() {
        let handler: Handler = Arc::new(|target| {
            if target.contains("id=3") {
                (200, json!({"id": 3, "nombre": "Sara Concha", "partido": "PSC"}).to_string())
            } else {
                (200, "null".into())
            }
        });
        let url = spawn_server(handler, Duration::ZERO).await;
        let c = client(&url);
        let cancel = CancellationToken::new();

        let found = c.fetch_deputy(&DeputyId::Num(3), &cancel).await;
        assert_eq!(found.source, Source::Live);
        assert_eq!(found.value.map(|d| d.name), Some("Sara Concha".into()));

        let missing = c.fetch_deputy(&DeputyId::Num(4), &cancel).await;
        assert_eq!(missing.source, Source::Live);
        assert!(missing.value.is_none());
    }

    #[tokio::test]
    async fn deputy_detail_from_fallback() {
        let c = ApiClient::new(ApiConfig::default()).unwrap();
        let got = c
            .fetch_deputy(&DeputyId::Num(1), &CancellationToken::new())
            .await;
        assert!(got.source.is_fallback());
        assert_eq!(
            got.value.map(|d| d.name),
            Some("María Candelaria Acevedo".into())
        );
    }
}
