//! Handler for the `alerts` command.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde_json::json;

use crate::adapter::inbound::cli::command::LimitArgs;
use crate::adapter::inbound::cli::config::{init_command_logging, load_config};
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::NullNotifier;
use crate::error::Result;
use crate::infrastructure::Session;

pub async fn execute(args: &LimitArgs) -> Result<()> {
    let config = load_config(&args.service)?;
    init_command_logging(&config);

    let session = Session::bootstrap(config, Arc::new(NullNotifier));
    let alerts = session.history().recent(args.limit).await;

    if output::is_json() {
        output::json_output(json!({"command": "alerts", "alerts": alerts}));
        return Ok(());
    }

    output::section("Recent alerts");
    if alerts.is_empty() {
        output::hint("no alerts yet");
        return Ok(());
    }
    for alert in &alerts {
        let when = alert
            .timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp_millis((secs * 1000.0) as i64))
            .map_or_else(
                || "--:--:--".to_string(),
                |at| at.with_timezone(&Local).format("%H:%M:%S").to_string(),
            );
        output::alert(&when, alert.level, &alert.message);
    }
    Ok(())
}
