//! Two-tier reachability probe.
//!
//! Tries the dedicated health path first, then falls back to a no-body
//! capability probe against the prediction path, since some deployments do
//! not expose a health route. Any response to the fallback, including an
//! error status such as 405, counts as reachable: only socket-level
//! reachability is being tested.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use super::gateway::RequestGateway;
use crate::domain::{Reachability, ServiceEndpoints};
use crate::error::RequestError;
use crate::port::HttpRequest;

pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_CAPABILITY_PATH: &str = "/predict";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2_500);

/// Determines whether the service is reachable.
pub struct HealthProbe {
    gateway: RequestGateway,
    health_url: Url,
    capability_url: Url,
    timeout: Duration,
}

impl HealthProbe {
    /// Probe using the default paths and timeout.
    #[must_use]
    pub fn new(gateway: RequestGateway, endpoints: &ServiceEndpoints) -> Self {
        Self::with_paths(
            gateway,
            endpoints,
            DEFAULT_HEALTH_PATH,
            DEFAULT_CAPABILITY_PATH,
            DEFAULT_PROBE_TIMEOUT,
        )
    }

    #[must_use]
    pub fn with_paths(
        gateway: RequestGateway,
        endpoints: &ServiceEndpoints,
        health_path: &str,
        capability_path: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            health_url: endpoints.http_url(health_path),
            capability_url: endpoints.http_url(capability_path),
            timeout,
        }
    }

    /// Run the probe sequence. Never fails; failures degrade to `Unreachable`.
    pub async fn check(&self) -> Reachability {
        match self
            .gateway
            .request(HttpRequest::get(self.health_url.clone()), self.timeout)
            .await
        {
            // A 2xx whose body fails to decode still proves the socket is up.
            Ok(_) => {
                info!(url = %self.health_url, "Service reachable");
                return Reachability::Reachable;
            }
            Err(RequestError::MalformedPayload(_)) => {
                info!(url = %self.health_url, "Service reachable (unreadable health body)");
                return Reachability::Reachable;
            }
            Err(err) => {
                debug!(error = %err, url = %self.health_url, "Health check failed, trying capability probe");
            }
        }

        match self
            .gateway
            .request(HttpRequest::options(self.capability_url.clone()), self.timeout)
            .await
        {
            Ok(_) => {
                info!(url = %self.capability_url, "Service reachable via capability probe");
                Reachability::Reachable
            }
            Err(err) if err.received_response() => {
                info!(
                    url = %self.capability_url,
                    response = %err,
                    "Service reachable via capability probe"
                );
                Reachability::Reachable
            }
            Err(err) => {
                warn!(error = %err, "Service unreachable");
                Reachability::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::port::HttpMethod;
    use crate::testkit::{self, http::ScriptedTransport, http::TransportReply};
    use serde_json::json;

    fn probe(transport: &Arc<ScriptedTransport>) -> HealthProbe {
        HealthProbe::with_paths(
            RequestGateway::new(transport.clone()),
            &testkit::domain::endpoints(),
            "/health",
            "/predict",
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_healthy_primary_skips_fallback() {
        let transport = Arc::new(ScriptedTransport::new().route(
            HttpMethod::Get,
            "/health",
            TransportReply::json(200, json!({"status": "ok"})),
        ));

        assert_eq!(probe(&transport).check().await, Reachability::Reachable);
        assert_eq!(transport.count_for(HttpMethod::Options, "/predict"), 0);
    }

    #[tokio::test]
    async fn test_primary_timeout_with_fallback_response_is_reachable() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(HttpMethod::Get, "/health", TransportReply::hang())
                .route(
                    HttpMethod::Options,
                    "/predict",
                    TransportReply::text(405, "Method Not Allowed"),
                ),
        );

        assert_eq!(probe(&transport).check().await, Reachability::Reachable);
        assert_eq!(transport.count_for(HttpMethod::Options, "/predict"), 1);
    }

    #[tokio::test]
    async fn test_missing_health_route_falls_back() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(HttpMethod::Get, "/health", TransportReply::text(404, "nope"))
                .route(HttpMethod::Options, "/predict", TransportReply::text(200, "")),
        );

        assert_eq!(probe(&transport).check().await, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_both_probes_failing_is_unreachable() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(HttpMethod::Get, "/health", TransportReply::unreachable())
                .route(HttpMethod::Options, "/predict", TransportReply::hang()),
        );

        assert_eq!(probe(&transport).check().await, Reachability::Unreachable);
    }

    #[tokio::test]
    async fn test_unreadable_health_body_counts_as_reachable() {
        let transport = Arc::new(ScriptedTransport::new().route(
            HttpMethod::Get,
            "/health",
            TransportReply::raw(200, Some("application/json"), b"<html>"),
        ));

        assert_eq!(probe(&transport).check().await, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_fallback_network_error_is_unreachable() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route(HttpMethod::Get, "/health", TransportReply::error(RequestError::Timeout))
                .route(HttpMethod::Options, "/predict", TransportReply::unreachable()),
        );

        assert_eq!(probe(&transport).check().await, Reachability::Unreachable);
    }
}
