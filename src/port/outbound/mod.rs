//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the network dependencies of the client: the HTTP
//! transport, the push channel, and notification sinks.

pub mod channel;
pub mod http;
pub mod notifier;
