//! One-shot activation of the remote alert simulation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use super::gateway::RequestGateway;
use crate::domain::ServiceEndpoints;
use crate::port::HttpRequest;

pub const START_STREAM_PATH: &str = "/start_stream";

/// Result of a priming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimeOutcome {
    /// The activation request was accepted.
    Activated,
    /// An activation request was already sent in this session.
    AlreadyPrimed,
    /// The activation request failed; it will not be retried.
    Failed,
}

/// Sends the stream activation request at most once per session.
pub struct StreamPrimer {
    gateway: RequestGateway,
    url: Url,
    timeout: Duration,
    primed: AtomicBool,
}

impl StreamPrimer {
    pub fn new(gateway: RequestGateway, endpoints: &ServiceEndpoints, timeout: Duration) -> Self {
        Self {
            gateway,
            url: endpoints.http_url(START_STREAM_PATH),
            timeout,
            primed: AtomicBool::new(false),
        }
    }

    /// Ask the service to emit `seconds` worth of simulated alerts, one every
    /// `interval_secs`. Failures are logged and swallowed.
    pub async fn prime_once(&self, seconds: u32, interval_secs: f64) -> PrimeOutcome {
        if self.primed.swap(true, Ordering::SeqCst) {
            debug!("Stream already primed");
            return PrimeOutcome::AlreadyPrimed;
        }

        let body = json!({"seconds": seconds, "interval": interval_secs});
        match self
            .gateway
            .request(HttpRequest::post_json(self.url.clone(), body), self.timeout)
            .await
        {
            Ok(_) => {
                info!(seconds, interval_secs, "Simulation stream started");
                PrimeOutcome::Activated
            }
            Err(e) => {
                warn!(error = %e, "Failed to start simulation stream");
                PrimeOutcome::Failed
            }
        }
    }

    #[must_use]
    pub fn is_primed(&self) -> bool {
        self.primed.load(Ordering::SeqCst)
    }
}
