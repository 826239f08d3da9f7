#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use mediguard::infrastructure::{Adapters, Config, Session};
use mediguard::testkit::channel::{Script, ScriptedConnector};
use mediguard::testkit::domain::{directory, TEST_BASE};
use mediguard::testkit::http::ScriptedTransport;
use mediguard::testkit::notifier::RecordingNotifier;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Reference data matching `testkit::domain::directory`.
pub const REFERENCE_JSON: &str = r#"{
  "records": [
    {"key": "B-100", "name": "Paracetamol 500mg", "quality_pct": 92, "risk_level": "low",
     "supplier_id": "S1", "expiry_date": "2026-11-30"},
    {"key": "B-200", "name": "Amoxicillin 250mg", "quality_pct": 81, "risk_level": "high",
     "supplier_id": "S1"},
    {"key": "B-300", "name": "Ibuprofen 400mg", "quality_pct": 34, "risk_level": "medium",
     "supplier_id": "S1"},
    {"key": "B-400", "name": "Cetirizine 10mg", "quality_pct": 75, "risk_level": "medium",
     "supplier_id": "S2"}
  ],
  "suppliers": [
    {"id": "S1", "name": "PharmaCorp", "phone": "+1-555-0100"},
    {"id": "S2", "name": "HealthMeds"}
  ]
}"#;

fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("mediguard-{prefix}-{nanos}-{suffix}.{extension}"));
    path
}

pub fn write_temp_config(contents: &str) -> PathBuf {
    let path = temp_path("config", "toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

pub fn write_temp_reference() -> PathBuf {
    let path = temp_path("reference", "json");
    fs::write(&path, REFERENCE_JSON).expect("write temp reference");
    path
}

/// Fast timeouts and backoff against the test base address.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.service.base_url = Some(TEST_BASE.to_string());
    config.reconnection.initial_delay_ms = 10;
    config.reconnection.max_delay_ms = 40;
    config.probe.timeout_ms = 100;
    config.request.timeout_ms = 100;
    config
}

pub struct Harness {
    pub session: Session,
    pub transport: Arc<ScriptedTransport>,
    pub connector: Arc<ScriptedConnector>,
    pub notifier: RecordingNotifier,
}

/// Session over scripted adapters with the shared test directory.
pub fn harness(config: Config, transport: ScriptedTransport, scripts: Vec<Script>) -> Harness {
    let transport = Arc::new(transport);
    let connector = Arc::new(ScriptedConnector::new(scripts));
    let notifier = RecordingNotifier::new();
    let session = Session::with_adapters(
        config,
        Adapters {
            transport: transport.clone(),
            connector: connector.clone(),
            notifier: Arc::new(notifier.clone()),
        },
        directory(),
    );
    Harness {
        session,
        transport,
        connector,
        notifier,
    }
}
