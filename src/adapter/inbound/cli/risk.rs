//! Handler for the `risk` command.

use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::LimitArgs;
use crate::adapter::inbound::cli::config::{init_command_logging, load_config};
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::NullNotifier;
use crate::domain::{ListingSource, RiskEntry};
use crate::error::Result;
use crate::infrastructure::Session;

#[derive(Tabled)]
struct RiskRow {
    #[tabled(rename = "Batch")]
    batch: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Quality")]
    quality: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&RiskEntry> for RiskRow {
    fn from(entry: &RiskEntry) -> Self {
        let record = &entry.record;
        Self {
            batch: record.key.to_string(),
            name: record.name.clone(),
            quality: format!("{}%", record.quality_pct),
            risk: record.risk_level.to_string(),
            supplier: record.supplier_id.clone(),
            phone: entry.supplier_phone.clone().unwrap_or_else(|| "-".to_string()),
            note: entry.message.clone().unwrap_or_default(),
        }
    }
}

pub async fn execute(args: &LimitArgs) -> Result<()> {
    let config = load_config(&args.service)?;
    init_command_logging(&config);

    let session = Session::bootstrap(config, Arc::new(NullNotifier));
    let listing = session.engine().risk_listing(args.limit).await;

    if output::is_json() {
        output::json_output(json!({
            "command": "risk",
            "source": listing.source,
            "entries": listing.entries,
        }));
        return Ok(());
    }

    output::section("High-risk batches");
    if listing.source == ListingSource::Local {
        output::hint("service unavailable, showing local reference data");
    }
    if listing.is_empty() {
        output::success("No high-risk batches");
        return Ok(());
    }

    let rows: Vec<RiskRow> = listing.entries.iter().map(RiskRow::from).collect();
    output::table(&Table::new(rows).to_string());
    Ok(())
}
