//! Batch identifiers and the local reference dataset.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized batch identifier.
///
/// Trimmed and upper-cased so that `" b-1042 "` and `"B-1042"` join to the
/// same local and remote records. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookupKey(String);

impl LookupKey {
    /// Normalize raw user input, returning `None` when nothing is left.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LookupKey {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| "batch key must not be empty".to_string())
    }
}

impl From<LookupKey> for String {
    fn from(key: LookupKey) -> Self {
        key.0
    }
}

/// Risk classification of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a service or alert label onto a risk level.
    ///
    /// Alert severities are accepted too: `critical` reads as high and
    /// `warning` as medium.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" | "info" => Some(Self::Low),
            "medium" | "warning" | "warn" => Some(Self::Medium),
            "high" | "critical" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.pad(label)
    }
}

/// Upper bound of a quality percentage.
pub const MAX_QUALITY_PCT: u8 = 100;

/// A locally known batch. `quality_pct` lies in `0..=MAX_QUALITY_PCT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub key: LookupKey,
    pub name: String,
    pub quality_pct: u8,
    pub risk_level: RiskLevel,
    pub supplier_id: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl ReferenceRecord {
    /// High risk, or quality below 50%.
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.risk_level == RiskLevel::High || self.quality_pct < 50
    }
}

/// Supplier contact entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Read-only local reference dataset: batch records plus the supplier directory.
///
/// Record order is preserved for listings.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDirectory {
    records: Vec<ReferenceRecord>,
    index: HashMap<LookupKey, usize>,
    suppliers: HashMap<String, Supplier>,
}

impl ReferenceDirectory {
    /// Build a directory. Later records with a duplicate key replace earlier ones.
    #[must_use]
    pub fn new(records: Vec<ReferenceRecord>, suppliers: Vec<Supplier>) -> Self {
        let mut deduped: Vec<ReferenceRecord> = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            match index.get(&record.key) {
                Some(&slot) => deduped[slot] = record,
                None => {
                    index.insert(record.key.clone(), deduped.len());
                    deduped.push(record);
                }
            }
        }

        let suppliers = suppliers
            .into_iter()
            .map(|supplier| (supplier.id.clone(), supplier))
            .collect();

        Self {
            records: deduped,
            index,
            suppliers,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &LookupKey) -> Option<&ReferenceRecord> {
        self.index.get(key).map(|&slot| &self.records[slot])
    }

    #[must_use]
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    #[must_use]
    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    /// Phone number of the supplier, when the directory has one.
    #[must_use]
    pub fn supplier_phone(&self, id: &str) -> Option<&str> {
        self.supplier(id).and_then(|s| s.phone.as_deref())
    }

    /// Display name of the supplier, falling back to its id.
    #[must_use]
    pub fn supplier_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.supplier(id).map_or(id, |s| s.name.as_str())
    }

    /// Records that are high risk or below 50% quality, in directory order.
    pub fn high_risk(&self) -> impl Iterator<Item = &ReferenceRecord> {
        self.records.iter().filter(|r| r.is_high_risk())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
