//! MediGuard - resilient alert feed and batch reconciliation client.
//!
//! Talks to a counterfeit-detection service over two channels: a persistent
//! push channel that delivers alerts, and request/response calls for batch
//! predictions, high-risk listings and stored alerts.
//!
//! # Architecture
//!
//! - **`domain`** - Pure types: batch keys, reference data, alerts, backoff
//! - **`port`** - Traits for HTTP transport, push channels and notifiers
//! - **`application`** - Gateway, health probe, connection manager,
//!   reconciliation engine, stream primer and alert history
//! - **`adapter`** - reqwest and tokio-tungstenite implementations, the CLI
//! - **`infrastructure`** - TOML configuration, logging and session wiring
//!
//! # Example
//!
//! ```no_run
//! use mediguard::domain::LookupKey;
//!
//! let key = LookupKey::parse(" b-100 ").unwrap();
//! assert_eq!(key.as_str(), "B-100");
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
