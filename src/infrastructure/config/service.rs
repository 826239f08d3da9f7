//! Service address, probe, request, stream and reference-data settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Where the service lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Explicit base address. Overridden by `MEDIGUARD_API_BASE`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Origin the client is served from, used when no base is given.
    #[serde(default)]
    pub origin: Option<String>,
    /// Push-channel path appended to the base.
    #[serde(default = "default_push_path")]
    pub push_path: String,
}

fn default_push_path() -> String {
    "/ws".into()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            origin: None,
            push_path: default_push_path(),
        }
    }
}

/// Reachability probe settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Path probed with a bodiless request when the health path fails.
    #[serde(default = "default_capability_path")]
    pub capability_path: String,
}

const fn default_probe_timeout_ms() -> u64 {
    2_500
}

fn default_health_path() -> String {
    "/health".into()
}

fn default_capability_path() -> String {
    "/predict".into()
}

impl ProbeConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
            health_path: default_health_path(),
            capability_path: default_capability_path(),
        }
    }
}

/// Deadline for lookup, listing, history and priming requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_request_timeout_ms() -> u64 {
    8_000
}

impl RequestConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Simulation priming parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    /// Prime the simulation once the channel is started.
    #[serde(default = "default_stream_enabled")]
    pub enabled: bool,
    #[serde(default = "default_stream_seconds")]
    pub seconds: u32,
    #[serde(default = "default_stream_interval_secs")]
    pub interval_secs: f64,
}

pub const STREAM_SECONDS_RANGE: std::ops::RangeInclusive<u32> = 5..=600;
pub const STREAM_INTERVAL_RANGE: std::ops::RangeInclusive<f64> = 0.2..=10.0;

const fn default_stream_enabled() -> bool {
    true
}

const fn default_stream_seconds() -> u32 {
    30
}

const fn default_stream_interval_secs() -> f64 {
    1.0
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enabled: default_stream_enabled(),
            seconds: default_stream_seconds(),
            interval_secs: default_stream_interval_secs(),
        }
    }
}

/// Local reference dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceConfig {
    /// JSON file with `records` and `suppliers`. Without it the directory is empty.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
