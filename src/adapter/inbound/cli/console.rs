//! Terminal notifier for the `run` command.

use chrono::{DateTime, Local, Utc};

use crate::adapter::inbound::cli::output;
use crate::port::{Event, Notifier};

/// Prints alerts as they arrive.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::Alert(alert) => {
                output::alert(&timestamp(alert.timestamp), alert.level, &alert.message);
            }
            Event::TestResult(result) => {
                if output::verbosity() > 0 {
                    let batch = result.batch.as_deref().unwrap_or("?");
                    let score = result
                        .fake_score
                        .map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));
                    output::field("Test", format!("batch {batch}, fake score {score}"));
                }
            }
            Event::StreamEnded { stream_id } => {
                let id = stream_id.unwrap_or_else(|| "-".to_string());
                output::hint(&format!("simulation stream {id} ended"));
            }
        }
    }
}

/// `HH:MM:SS` in local time, from epoch seconds when the service sent them.
fn timestamp(epoch_secs: Option<f64>) -> String {
    let at = epoch_secs
        .and_then(|secs| DateTime::<Utc>::from_timestamp_millis((secs * 1000.0) as i64))
        .unwrap_or_else(Utc::now);
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
