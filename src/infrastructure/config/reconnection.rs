//! Push-channel reconnection settings.

use serde::Deserialize;

use crate::domain::Backoff;

/// Backoff applied between reconnection attempts. Attempts are unbounded.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectionConfig {
    /// Delay before the first retry (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Delay ceiling (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Growth factor applied after each failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

const fn default_initial_delay_ms() -> u64 {
    1_000
}

const fn default_max_delay_ms() -> u64 {
    30_000
}

const fn default_backoff_multiplier() -> f64 {
    1.8
}

impl ReconnectionConfig {
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            self.initial_delay_ms,
            self.max_delay_ms,
            self.backoff_multiplier,
        )
    }
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}
