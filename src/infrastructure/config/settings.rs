//! Application configuration loading and validation.
//!
//! Configuration comes from an optional TOML file; a missing file yields the
//! defaults so the client always comes up. `MEDIGUARD_API_BASE` overrides
//! `[service] base_url`.
//!
//! # Example
//!
//! ```no_run
//! use mediguard::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use super::endpoint::ConfigResolver;
use super::logging::LoggingConfig;
use super::reconnection::ReconnectionConfig;
use super::service::{
    ProbeConfig, ReferenceConfig, RequestConfig, ServiceConfig, StreamConfig,
    STREAM_INTERVAL_RANGE, STREAM_SECONDS_RANGE,
};
use crate::domain::ServiceEndpoints;
use crate::error::{ConfigError, Error, Result};

/// Environment variable overriding the service base address.
pub const API_BASE_ENV: &str = "MEDIGUARD_API_BASE";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Push-channel reconnection backoff.
    #[serde(default)]
    pub reconnection: ReconnectionConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub request: RequestConfig,

    /// Simulation priming.
    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub reference: ReferenceConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying the environment override.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_api_base(std::env::var(API_BASE_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or the defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is malformed,
    /// or fails validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::parse_toml(""),
            Err(e) => Err(ConfigError::ReadFile(e).into()),
        }
    }

    /// Replace the configured base address with a non-empty override.
    pub fn apply_api_base(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.service.base_url = Some(value);
        }
    }

    /// Resolve the service endpoints from this configuration.
    #[must_use]
    pub fn endpoints(&self) -> ServiceEndpoints {
        ConfigResolver::new(self.service.push_path.clone()).resolve(
            self.service.base_url.as_deref(),
            self.service.origin.as_deref(),
        )
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.service.push_path.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "push_path" }.into());
        }

        let reconnection = &self.reconnection;
        if reconnection.initial_delay_ms == 0 {
            return Err(invalid("initial_delay_ms", "must be greater than 0"));
        }
        if reconnection.max_delay_ms < reconnection.initial_delay_ms {
            return Err(invalid("max_delay_ms", "must be >= initial_delay_ms"));
        }
        if reconnection.backoff_multiplier.is_nan() || reconnection.backoff_multiplier < 1.0 {
            return Err(invalid("backoff_multiplier", "must be >= 1.0"));
        }

        if self.probe.timeout_ms == 0 {
            return Err(invalid("probe.timeout_ms", "must be greater than 0"));
        }
        if self.request.timeout_ms == 0 {
            return Err(invalid("request.timeout_ms", "must be greater than 0"));
        }

        if !STREAM_SECONDS_RANGE.contains(&self.stream.seconds) {
            return Err(invalid("stream.seconds", "must be between 5 and 600"));
        }
        if !STREAM_INTERVAL_RANGE.contains(&self.stream.interval_secs) {
            return Err(invalid("stream.interval_secs", "must be between 0.2 and 10.0"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
