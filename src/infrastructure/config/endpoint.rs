//! Resolution of the service endpoints from an override, an origin or the
//! local default.

use tracing::{info, warn};
use url::Url;

use crate::domain::ServiceEndpoints;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PUSH_PATH: &str = "/ws";

/// Which input produced the resolved base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSource {
    Override,
    Origin,
    Default,
}

/// Derives [`ServiceEndpoints`] once per session.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    push_path: String,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PUSH_PATH)
    }
}

impl ConfigResolver {
    #[must_use]
    pub fn new(push_path: impl Into<String>) -> Self {
        Self {
            push_path: push_path.into(),
        }
    }

    /// Resolve the endpoints. Never fails.
    ///
    /// A non-empty `override_base` wins; otherwise `origin` is used when it is
    /// an HTTP(S) origin; otherwise the local default.
    #[must_use]
    pub fn resolve(&self, override_base: Option<&str>, origin: Option<&str>) -> ServiceEndpoints {
        let (base, source) = self.pick_base(override_base, origin);
        let endpoints = ServiceEndpoints::derive(base, &self.push_path);
        info!(
            http = %endpoints.http_base(),
            push = %endpoints.push_url(),
            source = ?source,
            "Resolved service endpoints"
        );
        endpoints
    }

    fn pick_base(&self, override_base: Option<&str>, origin: Option<&str>) -> (Url, BaseSource) {
        if let Some(raw) = override_base.map(str::trim).filter(|s| !s.is_empty()) {
            match parse_http(raw.trim_end_matches('/')) {
                Some(url) => return (url, BaseSource::Override),
                None => warn!(value = raw, "Ignoring invalid base address override"),
            }
        }

        if let Some(url) = origin.map(str::trim).and_then(parse_http) {
            return (url, BaseSource::Origin);
        }

        (default_base(), BaseSource::Default)
    }

    /// The source `resolve` would use for these inputs.
    #[must_use]
    pub fn source(&self, override_base: Option<&str>, origin: Option<&str>) -> BaseSource {
        self.pick_base(override_base, origin).1
    }
}

fn parse_http(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    let is_http = matches!(url.scheme(), "http" | "https");
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    (is_http && has_host).then_some(url)
}

fn default_base() -> Url {
    match Url::parse(DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("default base address is a valid URL"),
    }
}
