//! Loads the local reference directory from a JSON file.
//!
//! ```json
//! {
//!   "records": [
//!     {"key": "B-1042", "name": "Paracetamol 500mg", "quality_pct": 92,
//!      "risk_level": "low", "supplier_id": "S1", "expiry_date": "2026-11-30"}
//!   ],
//!   "suppliers": [{"id": "S1", "name": "PharmaCorp", "phone": "+1-555-0100"}]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::batch::MAX_QUALITY_PCT;
use crate::domain::{ReferenceDirectory, ReferenceRecord, Supplier};
use crate::error::{ConfigError, Result};

#[derive(Debug, Default, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    records: Vec<ReferenceRecord>,
    #[serde(default)]
    suppliers: Vec<Supplier>,
}

/// Parse a reference directory from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a valid reference document, or if a
/// record's quality lies outside `0..=100`.
pub fn parse_reference(text: &str) -> Result<ReferenceDirectory> {
    let file: ReferenceFile = serde_json::from_str(text)?;
    if let Some(record) = file.records.iter().find(|r| r.quality_pct > MAX_QUALITY_PCT) {
        return Err(ConfigError::InvalidValue {
            field: "quality_pct",
            reason: format!(
                "batch {} has {}, expected 0..={MAX_QUALITY_PCT}",
                record.key, record.quality_pct
            ),
        }
        .into());
    }
    Ok(ReferenceDirectory::new(file.records, file.suppliers))
}

/// Load a reference directory from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_reference(path: &Path) -> Result<ReferenceDirectory> {
    let text = fs::read_to_string(path)?;
    let directory = parse_reference(&text)?;
    info!(path = %path.display(), records = directory.len(), "Loaded reference data");
    Ok(directory)
}
