//! Domain types for the alert feed and batch reconciliation.
//!
//! Everything here is pure data and rules; no I/O.
//!
//! - [`endpoint`] - Resolved service addresses
//! - [`connection`] - Push-channel state and reconnection backoff
//! - [`alert`] - Alerts and test-result diagnostics
//! - [`batch`] - Batch keys and the local reference directory
//! - [`prediction`] - Remote prediction request/response
//! - [`lookup`] - Merged lookup results
//! - [`risk`] - Risk listings and the field alias table
//! - [`health`] - Reachability

pub mod alert;
pub mod batch;
pub mod connection;
pub mod endpoint;
pub mod health;
pub mod lenient;
pub mod lookup;
pub mod prediction;
pub mod risk;

pub use alert::{AlertEvent, AlertLevel, TestResult};
pub use batch::{LookupKey, ReferenceDirectory, ReferenceRecord, RiskLevel, Supplier};
pub use connection::{Backoff, ConnectionState};
pub use endpoint::ServiceEndpoints;
pub use health::Reachability;
pub use lookup::{LookupOutcome, LookupResult, QualitySource};
pub use prediction::{PredictionRequest, PredictionResult};
pub use risk::{ListingSource, RiskEntry, RiskListing};
