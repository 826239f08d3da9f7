//! Recording notifier for asserting on dispatched events.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::domain::AlertEvent;
use crate::port::{Event, Notifier};

/// Thread-safe event collector.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn alerts(&self) -> Vec<AlertEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Alert(alert) => Some(alert.clone()),
                _ => None,
            })
            .collect()
    }

    /// Poll until at least `count` events arrived or `timeout` elapses.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.len() >= count
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
