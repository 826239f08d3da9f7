//! Recent alerts kept by the service.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::gateway::RequestGateway;
use crate::domain::{AlertEvent, ServiceEndpoints};
use crate::port::HttpRequest;

pub const ALERTS_PATH: &str = "/alerts";

/// Reads the service's alert history, newest first.
pub struct AlertHistory {
    gateway: RequestGateway,
    url: Url,
    timeout: Duration,
}

impl AlertHistory {
    pub fn new(gateway: RequestGateway, endpoints: &ServiceEndpoints, timeout: Duration) -> Self {
        Self {
            gateway,
            url: endpoints.http_url(ALERTS_PATH),
            timeout,
        }
    }

    /// Up to `limit` recent alerts. Any failure yields an empty list.
    ///
    /// Rows that do not decode as alerts are skipped individually.
    pub async fn recent(&self, limit: usize) -> Vec<AlertEvent> {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("limit", &limit.to_string());

        let rows = match self.gateway.request(HttpRequest::get(url), self.timeout).await {
            Ok(body) => match body.into_json() {
                Some(Value::Array(rows)) => rows,
                _ => {
                    warn!("Alert history is not a sequence");
                    return Vec::new();
                }
            },
            Err(e) => {
                debug!(error = %e, "Alert history unavailable");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| serde_json::from_value::<AlertEvent>(row).ok())
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::AlertLevel;
    use crate::port::HttpMethod;
    use crate::testkit::domain::endpoints;
    use crate::testkit::http::{ScriptedTransport, TransportReply};
    use serde_json::json;

    fn history(transport: &Arc<ScriptedTransport>) -> AlertHistory {
        AlertHistory::new(
            RequestGateway::new(transport.clone()),
            &endpoints(),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_recent_alerts_decode() {
        let transport = Arc::new(ScriptedTransport::new().route(
            HttpMethod::Get,
            "/alerts",
            TransportReply::json(
                200,
                json!([
                    {"id": "2", "level": "CRITICAL", "message": "newest"},
                    {"level": "nonsense", "message": "skipped"},
                    {"id": "1", "level": "INFO", "message": "oldest"}
                ]),
            ),
        ));

        let alerts = history(&transport).recent(10).await;

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[1].message, "oldest");
        assert_eq!(transport.requests()[0].url.query(), Some("limit=10"));
    }

    #[tokio::test]
    async fn test_failure_is_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        assert!(history(&transport).recent(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_limit_is_applied_locally_too() {
        let transport = Arc::new(ScriptedTransport::new().route(
            HttpMethod::Get,
            "/alerts",
            TransportReply::json(
                200,
                json!([
                    {"level": "INFO", "message": "a"},
                    {"level": "INFO", "message": "b"},
                    {"level": "INFO", "message": "c"}
                ]),
            ),
        ));

        assert_eq!(history(&transport).recent(2).await.len(), 2);
    }
}
