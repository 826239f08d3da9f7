//! Configuration: file loading, validation, logging and endpoint resolution.

pub mod endpoint;
pub mod logging;
pub mod reconnection;
pub mod service;
pub mod settings;

pub use endpoint::{BaseSource, ConfigResolver};
pub use logging::LoggingConfig;
pub use reconnection::ReconnectionConfig;
pub use service::{ProbeConfig, ReferenceConfig, RequestConfig, ServiceConfig, StreamConfig};
pub use settings::{Config, API_BASE_ENV};
