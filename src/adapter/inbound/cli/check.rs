//! Handlers for `check health` and `check config`.

use std::sync::Arc;

use serde_json::json;

use crate::adapter::inbound::cli::command::ServiceArgs;
use crate::adapter::inbound::cli::config::{init_command_logging, load_config};
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::ReqwestTransport;
use crate::application::{HealthProbe, RequestGateway};
use crate::error::{Error, Result};

/// Probe the service and fail when it is unreachable.
pub async fn execute_health(args: &ServiceArgs) -> Result<()> {
    let config = load_config(args)?;
    init_command_logging(&config);

    let endpoints = config.endpoints();
    let probe = HealthProbe::with_paths(
        RequestGateway::new(Arc::new(ReqwestTransport::new())),
        &endpoints,
        &config.probe.health_path,
        &config.probe.capability_path,
        config.probe.timeout(),
    );
    let reachability = probe.check().await;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.health",
            "service": endpoints.http_base().as_str(),
            "status": reachability.to_string(),
        }));
    } else {
        output::section("Health Check");
        output::field("Service", endpoints.http_base());
        output::field("Status", reachability);
    }

    if !reachability.is_reachable() {
        output::error("Service unreachable");
        return Err(Error::Connection("service unreachable".to_string()));
    }
    output::success("Service reachable");
    Ok(())
}

/// Validate the configuration and print what it resolves to.
pub fn execute_config(args: &ServiceArgs) -> Result<()> {
    let config = load_config(args)?;
    let endpoints = config.endpoints();

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "valid": true,
            "service": endpoints.http_base().as_str(),
            "push": endpoints.push_url().as_str(),
            "reconnection": {
                "initial_delay_ms": config.reconnection.initial_delay_ms,
                "max_delay_ms": config.reconnection.max_delay_ms,
                "backoff_multiplier": config.reconnection.backoff_multiplier,
            },
            "stream": {
                "enabled": config.stream.enabled,
                "seconds": config.stream.seconds,
                "interval_secs": config.stream.interval_secs,
            },
        }));
        return Ok(());
    }

    output::section("Configuration");
    output::field("File", args.config.display());
    output::field("Service", endpoints.http_base());
    output::field("Alerts", endpoints.push_url());
    output::field(
        "Backoff",
        format!(
            "{}ms x{} up to {}ms",
            config.reconnection.initial_delay_ms,
            config.reconnection.backoff_multiplier,
            config.reconnection.max_delay_ms
        ),
    );
    if let Some(path) = &config.reference.path {
        output::field("Reference", path.display());
    }
    output::success("Configuration valid");
    Ok(())
}
