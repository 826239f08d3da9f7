//! Outbound adapters (driven side).

pub mod http;
pub mod notifier;
pub mod reference;
pub mod websocket;

pub use http::ReqwestTransport;
pub use notifier::{LogNotifier, NotifierRegistry, NullNotifier};
pub use reference::{load_reference, parse_reference};
pub use websocket::{WebSocketChannel, WebSocketConnector};
