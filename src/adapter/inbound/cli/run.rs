//! Handler for the `run` command.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::config::load_config;
use crate::adapter::inbound::cli::console::ConsoleNotifier;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::{LogNotifier, NotifierRegistry};
use crate::application::PrimeOutcome;
use crate::error::Result;
use crate::infrastructure::Session;

/// Follow the alert feed until Ctrl-C.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = load_config(&args.service)?;
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || output::is_json() {
        config.logging.format = "json".into();
    }
    if args.no_prime {
        config.stream.enabled = false;
    }
    config.init_logging();

    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(ConsoleNotifier));
    if config.logging.is_json() || output::verbosity() > 0 {
        notifiers.register(Box::new(LogNotifier));
    }

    let session = Session::bootstrap(config, Arc::new(notifiers));

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Service", session.endpoints().http_base());
    output::field("Alerts", session.endpoints().push_url());
    output::field("Reference", session.engine().directory().len());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let report = session.run(shutdown_rx).await;
    signal.abort();

    if !report.reachability.is_reachable() {
        output::warning("Service unreachable");
        output::hint("check the base address with `mediguard check config`");
        return Ok(());
    }

    if report.primed == Some(PrimeOutcome::Failed) {
        output::warning("Simulated alert stream could not be started");
    }
    info!("mediguard stopped");
    output::success("Stopped");
    Ok(())
}
