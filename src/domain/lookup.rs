//! Merged display result for a batch lookup.

use chrono::NaiveDate;
use serde::Serialize;

use super::batch::{LookupKey, ReferenceRecord, RiskLevel};
use super::prediction::PredictionResult;

/// Where the displayed quality figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitySource {
    /// Derived from the remote fake score.
    Remote,
    /// Taken from the local reference record.
    Local,
}

/// A local record and/or a remote prediction merged into one display record.
///
/// Derived per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    pub key: LookupKey,
    pub name: String,
    pub quality_pct: u8,
    pub quality_source: QualitySource,
    pub risk_level: Option<RiskLevel>,
    pub supplier_id: Option<String>,
    pub supplier_phone: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub fake_score: Option<f64>,
    pub predicted_fake: Option<bool>,
}

impl LookupResult {
    /// Merge the two sources. Returns `None` only when both are absent.
    ///
    /// Quality is remote-derived whenever a prediction exists. The supplier
    /// phone prefers the local directory over the remote value.
    #[must_use]
    pub fn merge(
        key: LookupKey,
        local: Option<&ReferenceRecord>,
        remote: Option<&PredictionResult>,
        directory_phone: Option<&str>,
    ) -> Option<Self> {
        let (quality_pct, quality_source) = match (remote, local) {
            (Some(prediction), _) => (prediction.quality_pct(), QualitySource::Remote),
            (None, Some(record)) => (record.quality_pct, QualitySource::Local),
            (None, None) => return None,
        };

        let name = local
            .map(|r| r.name.clone())
            .or_else(|| remote.and_then(|p| p.product_name.clone()))
            .unwrap_or_else(|| "Unknown".to_string());

        let supplier_phone = directory_phone
            .map(ToOwned::to_owned)
            .or_else(|| remote.and_then(|p| p.manufacturer_phone.clone()));

        Some(Self {
            key,
            name,
            quality_pct,
            quality_source,
            risk_level: local.map(|r| r.risk_level),
            supplier_id: local.map(|r| r.supplier_id.clone()),
            supplier_phone,
            expiry_date: local.and_then(|r| r.expiry_date),
            fake_score: remote.map(|p| p.fake_score),
            predicted_fake: remote.map(|p| p.predicted_fake),
        })
    }
}

/// Outcome of a lookup request.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(LookupResult),
    /// The key was empty after normalization.
    EmptyKey,
    /// No local record and no remote prediction.
    NotFound(LookupKey),
}

impl LookupOutcome {
    #[must_use]
    pub fn found(&self) -> Option<&LookupResult> {
        match self {
            Self::Found(result) => Some(result),
            _ => None,
        }
    }
}
