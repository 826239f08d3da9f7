//! Risk listings and the field alias table for heterogeneous risk rows.
//!
//! Rows from the service (and older deployments of it) name the same field in
//! different ways. Each canonical field has an ordered alias list; the first
//! alias holding a usable value wins, otherwise the documented default applies.

use serde::Serialize;
use serde_json::{Map, Value};

use super::batch::{LookupKey, ReferenceRecord, RiskLevel};
use super::lenient;
use super::prediction::quality_from_fake_score;

/// Canonical field of a [`ReferenceRecord`] populated from a risk row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Key,
    Name,
    QualityPct,
    RiskLevel,
    SupplierId,
    /// Carried alongside the record, see [`RiskEntry`].
    SupplierPhone,
    Message,
}

/// Ordered aliases for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub field: CanonicalField,
    pub aliases: &'static [&'static str],
}

/// Alias table, evaluated top to bottom, first present alias wins.
pub const FIELD_ALIASES: &[FieldAliases] = &[
    FieldAliases {
        field: CanonicalField::Key,
        aliases: &["batch", "batch_no", "batch_id", "id"],
    },
    FieldAliases {
        field: CanonicalField::Name,
        aliases: &[
            "name",
            "med",
            "medicine",
            "product",
            "product_name",
            "manufacturer",
        ],
    },
    FieldAliases {
        field: CanonicalField::QualityPct,
        aliases: &["quality", "quality_pct", "qualityPct"],
    },
    FieldAliases {
        field: CanonicalField::RiskLevel,
        aliases: &["risk", "risk_level", "riskLevel", "level"],
    },
    FieldAliases {
        field: CanonicalField::SupplierId,
        aliases: &["supplier", "supplier_id", "manufacturer"],
    },
    FieldAliases {
        field: CanonicalField::SupplierPhone,
        aliases: &["manufacturer_phone", "supplier_phone", "phone"],
    },
    FieldAliases {
        field: CanonicalField::Message,
        aliases: &["message", "reason"],
    },
];

pub const DEFAULT_KEY: &str = "N/A";
pub const DEFAULT_NAME: &str = "Unknown";
pub const DEFAULT_QUALITY_PCT: u8 = 0;
pub const DEFAULT_RISK_LEVEL: RiskLevel = RiskLevel::Medium;
pub const DEFAULT_SUPPLIER: &str = "Unknown";

/// Alias list for a canonical field.
#[must_use]
pub fn aliases_for(field: CanonicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|entry| entry.field == field)
        .map(|entry| entry.aliases)
        .unwrap_or(&[])
}

/// First alias holding a non-null, non-blank value.
#[must_use]
pub fn first_present<'a>(row: &'a Map<String, Value>, field: CanonicalField) -> Option<&'a Value> {
    aliases_for(field).iter().find_map(|alias| {
        row.get(*alias).filter(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
    })
}

/// Map a heterogeneous row onto the reference record shape.
///
/// Returns `None` when the row is not an object. Quality falls back to the
/// row's `fake_score` before the default.
#[must_use]
pub fn normalize_record(row: &Value) -> Option<ReferenceRecord> {
    let row = row.as_object()?;

    let key = first_present(row, CanonicalField::Key)
        .and_then(lenient::text)
        .and_then(|text| LookupKey::parse(&text))
        .or_else(|| LookupKey::parse(DEFAULT_KEY))?;

    let name = first_present(row, CanonicalField::Name)
        .and_then(lenient::text)
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let quality_pct = first_present(row, CanonicalField::QualityPct)
        .and_then(lenient::number)
        .map(|q| q.clamp(0.0, 100.0).round() as u8)
        .or_else(|| {
            row.get("fake_score")
                .and_then(lenient::number)
                .map(quality_from_fake_score)
        })
        .unwrap_or(DEFAULT_QUALITY_PCT);

    let risk_level = first_present(row, CanonicalField::RiskLevel)
        .and_then(Value::as_str)
        .and_then(RiskLevel::from_label)
        .unwrap_or(DEFAULT_RISK_LEVEL);

    let supplier_id = first_present(row, CanonicalField::SupplierId)
        .and_then(lenient::text)
        .unwrap_or_else(|| DEFAULT_SUPPLIER.to_string());

    Some(ReferenceRecord {
        key,
        name,
        quality_pct,
        risk_level,
        supplier_id,
        expiry_date: None,
    })
}

/// A risk record plus the contact and explanation the service attaches to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    #[serde(flatten)]
    pub record: ReferenceRecord,
    pub supplier_phone: Option<String>,
    pub message: Option<String>,
}

impl RiskEntry {
    #[must_use]
    pub fn new(record: ReferenceRecord) -> Self {
        Self {
            record,
            supplier_phone: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<&str>) -> Self {
        self.supplier_phone = phone.map(ToOwned::to_owned);
        self
    }
}

/// [`normalize_record`] plus the row's supplier phone and message, when present.
#[must_use]
pub fn normalize_entry(row: &Value) -> Option<RiskEntry> {
    let record = normalize_record(row)?;
    let fields = row.as_object()?;
    Some(RiskEntry {
        record,
        supplier_phone: first_present(fields, CanonicalField::SupplierPhone).and_then(lenient::text),
        message: first_present(fields, CanonicalField::Message).and_then(lenient::text),
    })
}

/// Which source produced a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    Remote,
    Local,
}

/// Ordered risk records for display. Empty is a valid outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskListing {
    pub source: ListingSource,
    pub entries: Vec<RiskEntry>,
}

impl RiskListing {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
