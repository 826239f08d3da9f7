//! Session orchestration.

pub mod session;

pub use session::{load_directory, Adapters, RunReport, Session};
