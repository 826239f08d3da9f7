//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`HttpTransport`] - One HTTP call, no timeout or retry
//! - [`PushConnector`], [`PushChannel`] - Push-channel I/O
//! - [`Notifier`] - Alert and diagnostic sinks

pub mod outbound;

pub use outbound::channel::{PushChannel, PushConnector};
pub use outbound::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use outbound::notifier::{Event, Notifier};
