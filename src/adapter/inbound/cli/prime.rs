//! Handler for the `prime` command.

use std::sync::Arc;

use serde_json::json;

use crate::adapter::inbound::cli::command::PrimeArgs;
use crate::adapter::inbound::cli::config::{init_command_logging, load_config};
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::NullNotifier;
use crate::application::PrimeOutcome;
use crate::error::{Error, Result};
use crate::infrastructure::Session;

pub async fn execute(args: &PrimeArgs) -> Result<()> {
    let mut config = load_config(&args.service)?;
    if let Some(seconds) = args.seconds {
        config.stream.seconds = seconds;
    }
    if let Some(interval) = args.interval {
        config.stream.interval_secs = interval;
    }
    config.validate()?;
    init_command_logging(&config);

    let seconds = config.stream.seconds;
    let interval = config.stream.interval_secs;
    let session = Session::bootstrap(config, Arc::new(NullNotifier));
    let outcome = session.primer().prime_once(seconds, interval).await;

    let activated = outcome == PrimeOutcome::Activated;
    if output::is_json() {
        output::json_output(json!({
            "command": "prime",
            "activated": activated,
            "seconds": seconds,
            "interval": interval,
        }));
    } else if activated {
        output::success(&format!("Simulated alerts for {seconds}s, every {interval}s"));
    }

    if !activated {
        output::error("Could not start the simulated alert stream");
        return Err(Error::Connection("stream activation failed".to_string()));
    }
    Ok(())
}
