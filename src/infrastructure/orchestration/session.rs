//! Session composition and lifecycle.
//!
//! Endpoints are resolved once; every component shares them and a single
//! request gateway. The run sequence is strictly ordered: the probe finishes
//! before the push channel starts, and priming follows the start.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::outbound::{load_reference, ReqwestTransport, WebSocketConnector};
use crate::application::{
    AlertHistory, ConnectionManager, HealthProbe, PrimeOutcome, ReconciliationEngine,
    RequestGateway, StreamPrimer,
};
use crate::domain::{ReferenceDirectory, Reachability, ServiceEndpoints};
use crate::infrastructure::config::Config;
use crate::port::{HttpTransport, Notifier, PushConnector};

/// I/O implementations a session is built on.
pub struct Adapters {
    pub transport: Arc<dyn HttpTransport>,
    pub connector: Arc<dyn PushConnector>,
    pub notifier: Arc<dyn Notifier>,
}

impl Adapters {
    /// reqwest for HTTP, tokio-tungstenite for the push channel.
    pub fn live(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::new()),
            connector: Arc::new(WebSocketConnector),
            notifier,
        }
    }
}

/// Summary of a finished [`Session::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub reachability: Reachability,
    pub primed: Option<PrimeOutcome>,
}

/// All components of one client session.
pub struct Session {
    config: Config,
    endpoints: ServiceEndpoints,
    probe: HealthProbe,
    connection: ConnectionManager,
    primer: StreamPrimer,
    engine: ReconciliationEngine,
    history: AlertHistory,
}

impl Session {
    /// Build a session on the live adapters, loading reference data from the
    /// configured path.
    pub fn bootstrap(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let directory = load_directory(&config);
        Self::with_adapters(config, Adapters::live(notifier), directory)
    }

    pub fn with_adapters(config: Config, adapters: Adapters, directory: ReferenceDirectory) -> Self {
        let endpoints = config.endpoints();
        let gateway = RequestGateway::new(adapters.transport);
        let request_timeout = config.request.timeout();

        let probe = HealthProbe::with_paths(
            gateway.clone(),
            &endpoints,
            &config.probe.health_path,
            &config.probe.capability_path,
            config.probe.timeout(),
        );
        let connection = ConnectionManager::new(
            endpoints.push_url().clone(),
            adapters.connector,
            adapters.notifier,
            config.reconnection.backoff(),
        );
        let primer = StreamPrimer::new(gateway.clone(), &endpoints, request_timeout);
        let engine = ReconciliationEngine::new(
            gateway.clone(),
            &endpoints,
            Arc::new(directory),
            request_timeout,
        );
        let history = AlertHistory::new(gateway, &endpoints, request_timeout);

        Self {
            config,
            endpoints,
            probe,
            connection,
            primer,
            engine,
            history,
        }
    }

    /// Probe, start the push channel and prime the feed, then wait for
    /// shutdown. An unreachable service ends the run immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> RunReport {
        let reachability = self.probe.check().await;
        if !reachability.is_reachable() {
            warn!(url = %self.endpoints.http_base(), "Service unreachable, not starting alert feed");
            return RunReport {
                reachability,
                primed: None,
            };
        }

        self.connection.start().await;

        let primed = if self.config.stream.enabled {
            Some(
                self.primer
                    .prime_once(self.config.stream.seconds, self.config.stream.interval_secs)
                    .await,
            )
        } else {
            None
        };

        info!("Listening for alerts");
        loop {
            if *shutdown.borrow_and_update() {
                info!("Shutdown signal received");
                break;
            }
            if shutdown.changed().await.is_err() {
                info!("Shutdown channel closed");
                break;
            }
        }

        self.connection.stop().await;
        RunReport {
            reachability,
            primed,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    #[must_use]
    pub fn probe(&self) -> &HealthProbe {
        &self.probe
    }

    #[must_use]
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    #[must_use]
    pub fn primer(&self) -> &StreamPrimer {
        &self.primer
    }

    #[must_use]
    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    #[must_use]
    pub fn history(&self) -> &AlertHistory {
        &self.history
    }
}

/// Reference data from the configured path; empty when unset or unreadable.
pub fn load_directory(config: &Config) -> ReferenceDirectory {
    let Some(path) = &config.reference.path else {
        return ReferenceDirectory::empty();
    };
    match load_reference(path) {
        Ok(directory) => directory,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Reference data unavailable, continuing without it");
            ReferenceDirectory::empty()
        }
    }
}
