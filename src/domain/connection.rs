//! Push-channel lifecycle state and reconnection backoff.

use std::fmt;
use std::time::Duration;

/// Lifecycle state of the push channel.
///
/// Transitions are driven exclusively by the connection manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Not started, or explicitly stopped.
    #[default]
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// The channel is open and delivering events.
    Open,
    /// The channel failed or closed; a retry is scheduled.
    Reconnecting,
}

impl ConnectionState {
    /// True while the manager owns a live or pending physical channel.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(label)
    }
}

/// Bounded exponential backoff between reconnection attempts.
///
/// The current delay always stays within `[base, max]`. There is no attempt
/// ceiling, only a delay ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    base_delay_ms: u64,
    max_delay_ms: u64,
    multiplier: f64,
    current_delay_ms: u64,
}

impl Backoff {
    /// Create a backoff starting at `base_delay_ms`.
    ///
    /// A maximum below the base is raised to the base, and a multiplier below
    /// one is treated as one so delays never shrink.
    #[must_use]
    pub fn new(base_delay_ms: u64, max_delay_ms: u64, multiplier: f64) -> Self {
        let max_delay_ms = max_delay_ms.max(base_delay_ms);
        let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        Self {
            base_delay_ms,
            max_delay_ms,
            multiplier,
            current_delay_ms: base_delay_ms,
        }
    }

    /// Delay that the next retry will wait, in milliseconds.
    #[must_use]
    pub const fn current_delay_ms(&self) -> u64 {
        self.current_delay_ms
    }

    #[must_use]
    pub const fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    #[must_use]
    pub const fn max_delay_ms(&self) -> u64 {
        self.max_delay_ms
    }

    /// Return the delay for this failed attempt and grow it for the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_millis(self.current_delay_ms);

        let grown = (self.current_delay_ms as f64 * self.multiplier).round();
        self.current_delay_ms = if grown >= self.max_delay_ms as f64 {
            self.max_delay_ms
        } else {
            grown as u64
        };

        delay
    }

    /// Return to the base delay after a successful open.
    pub fn reset(&mut self) {
        self.current_delay_ms = self.base_delay_ms;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(1_000, 30_000, 1.8)
    }
}
