//! Alert and diagnostic events delivered over the push channel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" | "low" => Ok(Self::Info),
            "warning" | "warn" | "medium" => Ok(Self::Warning),
            "critical" | "high" => Ok(Self::Critical),
            other => Err(format!("unknown alert level: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for AlertLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        };
        f.pad(label)
    }
}

/// An alert produced by the remote service.
///
/// Only `level` and `message` are required; the service also attaches
/// identity and supplier contact metadata. Never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub level: AlertLevel,
    pub message: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub manufacturer_phone: Option<String>,
}

impl AlertEvent {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            id: None,
            timestamp: None,
            manufacturer: None,
            manufacturer_phone: None,
        }
    }
}

/// Summary of a simulated hardware test, decoded leniently for logging.
///
/// The raw payload is retained so nothing the service sends is lost.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub batch: Option<String>,
    pub manufacturer: Option<String>,
    pub fake_score: Option<f64>,
    pub predicted_fake: Option<bool>,
    pub days_to_expiry: Option<i64>,
    pub raw: Value,
}

impl TestResult {
    /// Decode whatever fields are recognizable; never fails.
    #[must_use]
    pub fn from_payload(raw: Value) -> Self {
        Self {
            batch: present(&raw, "batch").and_then(lenient::text),
            manufacturer: present(&raw, "manufacturer").and_then(lenient::text),
            fake_score: present(&raw, "fake_score").and_then(lenient::number),
            predicted_fake: present(&raw, "predicted_fake").and_then(lenient::flag),
            days_to_expiry: present(&raw, "days_to_expiry")
                .and_then(lenient::number)
                .map(|d| d as i64),
            raw,
        }
    }
}

fn present<'a>(raw: &'a Value, name: &str) -> Option<&'a Value> {
    raw.get(name).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_is_case_insensitive() {
        let alert: AlertEvent =
            serde_json::from_value(json!({"level": "CRITICAL", "message": "expired"})).unwrap();
        assert_eq!(alert.level, AlertLevel::Critical);
        assert_eq!(alert.message, "expired");
        assert!(alert.id.is_none());
    }

    #[test]
    fn test_service_metadata_is_kept() {
        let alert: AlertEvent = serde_json::from_value(json!({
            "id": "a-1",
            "timestamp": 1732500000.5,
            "level": "WARNING",
            "manufacturer": "HealthMeds",
            "manufacturer_phone": "+91-555-0101",
            "message": "WARNING: ML suspicious (score=0.612) | supplier=HealthMeds",
            "data": "{}"
        }))
        .unwrap();

        assert_eq!(alert.level, AlertLevel::Warning);
        assert_eq!(alert.manufacturer.as_deref(), Some("HealthMeds"));
        assert_eq!(alert.manufacturer_phone.as_deref(), Some("+91-555-0101"));
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let result: Result<AlertEvent, _> =
            serde_json::from_value(json!({"level": "PANIC", "message": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_test_result_decodes_leniently() {
        let result = TestResult::from_payload(json!({
            "batch": "SIM4821",
            "manufacturer": "PharmaCorp",
            "fake_score": 0.85,
            "predicted_fake": 1,
            "days_to_expiry": 42,
            "test_metrics": {"x": 0.3}
        }));

        assert_eq!(result.batch.as_deref(), Some("SIM4821"));
        assert_eq!(result.predicted_fake, Some(true));
        assert_eq!(result.days_to_expiry, Some(42));
        assert!(result.raw.get("test_metrics").is_some());
    }

    #[test]
    fn test_test_result_tolerates_garbage() {
        let result = TestResult::from_payload(json!("not an object"));
        assert!(result.batch.is_none());
        assert!(result.fake_score.is_none());
    }
}
