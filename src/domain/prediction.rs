//! Remote prediction request/response and quality derivation.

use serde::{Deserialize, Serialize};

use super::batch::{LookupKey, ReferenceDirectory, ReferenceRecord};
use super::lenient;

/// Manufacturer sent when nothing is known locally about a batch.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// Body of a prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    pub manufacturer: String,
    pub expiry_date: Option<String>,
    pub batch: String,
}

impl PredictionRequest {
    /// Build a request for `key`, carrying local supplier and expiry when known.
    #[must_use]
    pub fn for_lookup(
        key: &LookupKey,
        local: Option<&ReferenceRecord>,
        directory: &ReferenceDirectory,
    ) -> Self {
        match local {
            Some(record) => Self {
                manufacturer: directory.supplier_name(&record.supplier_id).to_string(),
                expiry_date: record.expiry_date.map(|d| d.format("%Y-%m-%d").to_string()),
                batch: key.to_string(),
            },
            None => Self {
                manufacturer: UNKNOWN_MANUFACTURER.to_string(),
                expiry_date: None,
                batch: key.to_string(),
            },
        }
    }
}

/// Authoritative prediction returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    pub fake_score: f64,
    #[serde(default, deserialize_with = "lenient::deserialize_flag")]
    pub predicted_fake: bool,
    #[serde(default)]
    pub manufacturer_phone: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
}

impl PredictionResult {
    /// Quality percentage implied by the fake score.
    #[must_use]
    pub fn quality_pct(&self) -> u8 {
        quality_from_fake_score(self.fake_score)
    }
}

/// Slack for binary representation error, so `x.5` ties round up.
const TIE_EPSILON: f64 = 1e-9;

/// `round((1 - fake_score) * 100)` half-up, with the score clamped to `[0, 1]`.
#[must_use]
pub fn quality_from_fake_score(fake_score: f64) -> u8 {
    if fake_score.is_nan() {
        return 0;
    }
    let score = fake_score.clamp(0.0, 1.0);
    let quality = ((1.0 - score) * 100.0 + TIE_EPSILON).round();
    quality.min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::{RiskLevel, Supplier};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_quality_derivation() {
        assert_eq!(quality_from_fake_score(0.12), 88);
        assert_eq!(quality_from_fake_score(1.0), 0);
        assert_eq!(quality_from_fake_score(0.0), 100);
        assert_eq!(quality_from_fake_score(0.125), 88);
    }

    #[test]
    fn test_quality_ties_round_up() {
        assert_eq!(quality_from_fake_score(0.145), 86);
        assert_eq!(quality_from_fake_score(0.005), 100);
        assert_eq!(quality_from_fake_score(0.355), 65);
        assert_eq!(quality_from_fake_score(0.1449), 86);
        assert_eq!(quality_from_fake_score(0.1451), 85);
    }

    #[test]
    fn test_quality_clamps_out_of_range_scores() {
        assert_eq!(quality_from_fake_score(-0.4), 100);
        assert_eq!(quality_from_fake_score(3.0), 0);
        assert_eq!(quality_from_fake_score(f64::NAN), 0);
    }

    #[test]
    fn test_result_accepts_integer_flag() {
        let result: PredictionResult = serde_json::from_value(json!({
            "manufacturer": "Unknown",
            "fake_score": 0.85,
            "predicted_fake": 1,
            "manufacturer_phone": null
        }))
        .unwrap();

        assert!(result.predicted_fake);
        assert!(result.manufacturer_phone.is_none());
        assert_eq!(result.quality_pct(), 15);
    }

    #[test]
    fn test_result_requires_score() {
        let result: Result<PredictionResult, _> =
            serde_json::from_value(json!({"predicted_fake": false}));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_uses_local_supplier_and_expiry() {
        let key = LookupKey::parse("b77").unwrap();
        let record = ReferenceRecord {
            key: key.clone(),
            name: "Amoxil".into(),
            quality_pct: 91,
            risk_level: RiskLevel::Low,
            supplier_id: "S2".into(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 3, 1),
        };
        let directory = ReferenceDirectory::new(
            vec![record.clone()],
            vec![Supplier {
                id: "S2".into(),
                name: "HealthMeds".into(),
                phone: None,
            }],
        );

        let request = PredictionRequest::for_lookup(&key, Some(&record), &directory);
        assert_eq!(request.manufacturer, "HealthMeds");
        assert_eq!(request.expiry_date.as_deref(), Some("2026-03-01"));
        assert_eq!(request.batch, "B77");
    }

    #[test]
    fn test_request_placeholders_without_local_record() {
        let key = LookupKey::parse("zz9").unwrap();
        let request = PredictionRequest::for_lookup(&key, None, &ReferenceDirectory::empty());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"manufacturer": "Unknown", "expiry_date": null, "batch": "ZZ9"})
        );
    }
}
