//! Infrastructure: configuration and session composition.

pub mod config;
pub mod orchestration;

pub use config::Config;
pub use orchestration::{Adapters, Session};
