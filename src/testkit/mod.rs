//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`http`] - `ScriptedTransport`, a route/queue driven [`HttpTransport`](crate::port::HttpTransport)
//! - [`channel`] - `ScriptedConnector`, replaying push-channel sessions
//! - [`notifier`] - `RecordingNotifier`
//! - [`domain`] - Builders for endpoints, records and channel frames

pub mod channel;
pub mod domain;
pub mod http;
pub mod notifier;
