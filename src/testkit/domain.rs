//! Builders for domain values used across tests.

use chrono::NaiveDate;
use serde_json::{json, Value};
use url::Url;

use crate::domain::{
    LookupKey, ReferenceDirectory, ReferenceRecord, RiskLevel, ServiceEndpoints, Supplier,
};

pub const TEST_BASE: &str = "http://mediguard.test:8000";

/// Endpoints for [`TEST_BASE`] with the default push path.
pub fn endpoints() -> ServiceEndpoints {
    match Url::parse(TEST_BASE) {
        Ok(base) => ServiceEndpoints::derive(base, "/ws"),
        Err(err) => panic!("test base url: {err}"),
    }
}

pub fn key(raw: &str) -> LookupKey {
    match LookupKey::parse(raw) {
        Some(key) => key,
        None => panic!("empty test key"),
    }
}

/// A record supplied by `S1` with no expiry.
pub fn record(key_raw: &str, name: &str, quality_pct: u8, risk_level: RiskLevel) -> ReferenceRecord {
    ReferenceRecord {
        key: key(key_raw),
        name: name.to_string(),
        quality_pct,
        risk_level,
        supplier_id: "S1".to_string(),
        expiry_date: None,
    }
}

pub fn supplier(id: &str, name: &str, phone: Option<&str>) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.map(ToOwned::to_owned),
    }
}

/// Four records, two of which are high risk (`B-200` by level, `B-300` by quality).
pub fn directory() -> ReferenceDirectory {
    let mut expiring = record("B-100", "Paracetamol 500mg", 92, RiskLevel::Low);
    expiring.expiry_date = NaiveDate::from_ymd_opt(2026, 11, 30);

    let mut other_supplier = record("B-400", "Cetirizine 10mg", 75, RiskLevel::Medium);
    other_supplier.supplier_id = "S2".to_string();

    ReferenceDirectory::new(
        vec![
            expiring,
            record("B-200", "Amoxicillin 250mg", 81, RiskLevel::High),
            record("B-300", "Ibuprofen 400mg", 34, RiskLevel::Medium),
            other_supplier,
        ],
        vec![
            supplier("S1", "PharmaCorp", Some("+1-555-0100")),
            supplier("S2", "HealthMeds", None),
        ],
    )
}

/// Push-channel alert envelope.
pub fn alert_frame(level: &str, message: &str) -> String {
    json!({"event": "alert", "alert": {"level": level, "message": message}}).to_string()
}

/// Push-channel test-result envelope.
pub fn test_result_frame(payload: Value) -> String {
    json!({"event": "test_result", "payload": payload}).to_string()
}
