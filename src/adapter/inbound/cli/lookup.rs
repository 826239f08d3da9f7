//! Handler for the `lookup` command.

use std::sync::Arc;

use serde_json::json;

use crate::adapter::inbound::cli::command::LookupArgs;
use crate::adapter::inbound::cli::config::{init_command_logging, load_config};
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::NullNotifier;
use crate::domain::{LookupOutcome, LookupResult, QualitySource};
use crate::error::Result;
use crate::infrastructure::Session;

pub async fn execute(args: &LookupArgs) -> Result<()> {
    let config = load_config(&args.service)?;
    init_command_logging(&config);

    let session = Session::bootstrap(config, Arc::new(NullNotifier));
    let outcome = session.engine().lookup(&args.batch).await;

    if output::is_json() {
        let body = match &outcome {
            LookupOutcome::Found(result) => json!({
                "command": "lookup",
                "status": "found",
                "result": result,
            }),
            LookupOutcome::EmptyKey => json!({"command": "lookup", "status": "empty_key"}),
            LookupOutcome::NotFound(key) => json!({
                "command": "lookup",
                "status": "not_found",
                "batch": key,
            }),
        };
        output::json_output(body);
        return Ok(());
    }

    match outcome {
        LookupOutcome::Found(result) => print_result(&result),
        LookupOutcome::EmptyKey => output::warning("Enter a batch number"),
        LookupOutcome::NotFound(key) => output::warning(&format!("Batch {key} not found")),
    }
    Ok(())
}

fn print_result(result: &LookupResult) {
    output::section(&format!("Batch {}", result.key));
    output::field("Name", &result.name);

    let source = match result.quality_source {
        QualitySource::Remote => "model",
        QualitySource::Local => "local record",
    };
    output::field(
        "Quality",
        format!("{}% {}", result.quality_pct, output::muted(format!("({source})"))),
    );
    if let Some(risk) = result.risk_level {
        output::field("Risk", risk);
    }
    if let Some(fake) = result.predicted_fake {
        output::field("Counterfeit", if fake { "suspected" } else { "not suspected" });
    }
    if let Some(supplier) = &result.supplier_id {
        output::field("Supplier", supplier);
    }
    if let Some(phone) = &result.supplier_phone {
        output::field("Phone", phone);
    }
    if let Some(expiry) = result.expiry_date {
        output::field("Expires", expiry);
    }
}
