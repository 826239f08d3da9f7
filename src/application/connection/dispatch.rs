//! Tagged-envelope dispatch for inbound push-channel frames.
//!
//! Every frame is a JSON object tagged by its `event` field. Each recognized
//! tag maps to exactly one handler; anything else is dropped without touching
//! the channel.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{AlertEvent, TestResult};
use crate::port::{Event, Notifier};

/// Envelope of a push-channel frame, keyed by its `event` tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ChannelEvent {
    Alert {
        alert: AlertEvent,
    },
    TestResult {
        #[serde(default)]
        payload: Value,
    },
    StreamEnded {
        #[serde(default)]
        stream_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Kind of a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Alert,
    TestResult,
    StreamEnded,
}

/// Why a frame was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not JSON, or a recognized tag whose body does not decode.
    Malformed,
    /// Missing or unknown `event` tag.
    Unrecognized,
}

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Delivered(EventKind),
    Dropped(DropReason),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("malformed"),
            Self::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// Routes decoded frames to the notifier.
#[derive(Clone)]
pub struct EventDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl EventDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Decode and dispatch one text frame. Never fails.
    pub fn handle_text(&self, text: &str) -> Dispatch {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Dropping non-JSON frame");
                return Dispatch::Dropped(DropReason::Malformed);
            }
        };

        if !value.get("event").is_some_and(Value::is_string) {
            warn!("Dropping untagged frame");
            return Dispatch::Dropped(DropReason::Unrecognized);
        }

        match serde_json::from_value::<ChannelEvent>(value) {
            Ok(event) => self.route(event),
            Err(e) => {
                warn!(error = %e, "Dropping malformed frame");
                Dispatch::Dropped(DropReason::Malformed)
            }
        }
    }

    fn route(&self, event: ChannelEvent) -> Dispatch {
        match event {
            ChannelEvent::Alert { alert } => {
                info!(level = %alert.level, id = ?alert.id, "Alert received");
                self.notifier.notify(Event::Alert(alert));
                Dispatch::Delivered(EventKind::Alert)
            }
            ChannelEvent::TestResult { payload } => {
                let result = TestResult::from_payload(payload);
                debug!(
                    batch = ?result.batch,
                    manufacturer = ?result.manufacturer,
                    fake_score = ?result.fake_score,
                    predicted_fake = ?result.predicted_fake,
                    days_to_expiry = ?result.days_to_expiry,
                    "Test result received"
                );
                self.notifier.notify(Event::TestResult(result));
                Dispatch::Delivered(EventKind::TestResult)
            }
            ChannelEvent::StreamEnded { stream_id } => {
                info!(stream_id = ?stream_id, "Simulation stream ended");
                self.notifier.notify(Event::StreamEnded { stream_id });
                Dispatch::Delivered(EventKind::StreamEnded)
            }
            ChannelEvent::Unknown => {
                warn!("Dropping frame with unknown event tag");
                Dispatch::Dropped(DropReason::Unrecognized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlertLevel;
    use crate::testkit::domain::{alert_frame, test_result_frame};
    use crate::testkit::notifier::RecordingNotifier;
    use serde_json::json;

    fn dispatcher() -> (EventDispatcher, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        (EventDispatcher::new(Arc::new(notifier.clone())), notifier)
    }

    #[test]
    fn test_alert_is_forwarded() {
        let (dispatcher, notifier) = dispatcher();

        let outcome = dispatcher.handle_text(&alert_frame("CRITICAL", "Batch B-1 expired"));

        assert_eq!(outcome, Dispatch::Delivered(EventKind::Alert));
        let alerts = notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[0].message, "Batch B-1 expired");
    }

    #[test]
    fn test_test_result_is_forwarded_for_logging() {
        let (dispatcher, notifier) = dispatcher();

        let outcome = dispatcher.handle_text(&test_result_frame(json!({
            "batch": "SIM1001",
            "fake_score": 0.2,
            "predicted_fake": 0
        })));

        assert_eq!(outcome, Dispatch::Delivered(EventKind::TestResult));
        assert!(notifier.alerts().is_empty());
        match &notifier.events()[0] {
            Event::TestResult(result) => {
                assert_eq!(result.batch.as_deref(), Some("SIM1001"));
                assert_eq!(result.predicted_fake, Some(false));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_stream_ended_is_recognized() {
        let (dispatcher, notifier) = dispatcher();

        let outcome = dispatcher.handle_text(r#"{"event":"stream_ended","stream_id":"s-9"}"#);

        assert_eq!(outcome, Dispatch::Delivered(EventKind::StreamEnded));
        assert!(matches!(
            &notifier.events()[0],
            Event::StreamEnded { stream_id: Some(id) } if id == "s-9"
        ));
    }

    #[test]
    fn test_bad_frames_are_dropped() {
        let (dispatcher, notifier) = dispatcher();

        let cases = [
            ("not json at all", DropReason::Malformed),
            (r#"{"alert":{"level":"INFO","message":"x"}}"#, DropReason::Unrecognized),
            (r#"{"event":42}"#, DropReason::Unrecognized),
            (r#"{"event":"heartbeat"}"#, DropReason::Unrecognized),
            (r#"{"event":"alert"}"#, DropReason::Malformed),
            (
                r#"{"event":"alert","alert":{"level":"PANIC","message":"x"}}"#,
                DropReason::Malformed,
            ),
            ("[1,2,3]", DropReason::Unrecognized),
        ];

        for (frame, reason) in cases {
            assert_eq!(dispatcher.handle_text(frame), Dispatch::Dropped(reason), "{frame}");
        }
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_bad_frame_does_not_block_next_one() {
        let (dispatcher, notifier) = dispatcher();

        dispatcher.handle_text("{{{");
        dispatcher.handle_text(&alert_frame("warning", "after garbage"));

        assert_eq!(notifier.alerts().len(), 1);
    }
}
