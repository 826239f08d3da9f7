//! Notifier port for events received from the push channel.

use crate::domain::{AlertEvent, TestResult};

/// Events forwarded to notification sinks.
#[derive(Debug, Clone)]
pub enum Event {
    /// An alert for the user.
    Alert(AlertEvent),
    /// Diagnostic test result, for logging only.
    TestResult(TestResult),
    /// The remote simulation stream finished.
    StreamEnded {
        stream_id: Option<String>,
    },
}

/// Trait for notification sinks.
///
/// Called from the push-channel task, one event at a time; implementations
/// should not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: Event);
}
