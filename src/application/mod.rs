//! Application services.
//!
//! These coordinate domain rules with the outbound ports:
//!
//! - [`gateway`] - Timeout-bounded requests
//! - [`health`] - Primary/fallback reachability probe
//! - [`connection`] - Push-channel lifecycle and event dispatch
//! - [`reconciliation`] - Batch lookup and risk listing
//! - [`primer`] - One-shot simulation activation
//! - [`history`] - Recent alerts

pub mod connection;
pub mod gateway;
pub mod health;
pub mod history;
pub mod primer;
pub mod reconciliation;

pub use connection::ConnectionManager;
pub use gateway::{Body, RequestGateway};
pub use health::HealthProbe;
pub use history::AlertHistory;
pub use primer::{PrimeOutcome, StreamPrimer};
pub use reconciliation::ReconciliationEngine;
