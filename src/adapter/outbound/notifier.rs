//! Notification sinks.

use tracing::{debug, info, warn};

use crate::domain::AlertLevel;
use crate::port::{Event, Notifier};

/// Fans events out to every registered notifier.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

/// Discards every event.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// Logs events through tracing. Critical alerts are logged at warn level.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::Alert(alert) => match alert.level {
                AlertLevel::Critical => warn!(
                    level = %alert.level,
                    manufacturer = ?alert.manufacturer,
                    phone = ?alert.manufacturer_phone,
                    message = %alert.message,
                    "Alert"
                ),
                _ => info!(
                    level = %alert.level,
                    manufacturer = ?alert.manufacturer,
                    message = %alert.message,
                    "Alert"
                ),
            },
            Event::TestResult(result) => {
                debug!(
                    batch = ?result.batch,
                    fake_score = ?result.fake_score,
                    predicted_fake = ?result.predicted_fake,
                    "Test result"
                );
            }
            Event::StreamEnded { stream_id } => {
                info!(stream_id = ?stream_id, "Simulation stream ended");
            }
        }
    }
}
