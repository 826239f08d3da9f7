//! HTTP transport port.
//!
//! A transport performs exactly one network call. Timeouts, status handling
//! and body decoding live in the request gateway above it.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::RequestError;

/// HTTP verbs used against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Options => "OPTIONS",
        };
        f.write_str(verb)
    }
}

/// An outbound request with an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            body: None,
        }
    }

    #[must_use]
    pub fn options(url: Url) -> Self {
        Self {
            method: HttpMethod::Options,
            url,
            body: None,
        }
    }

    #[must_use]
    pub fn post_json(url: Url, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            body: Some(body),
        }
    }
}

/// A raw response as received from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// True when the declared content type is JSON (`application/json` or `+json`).
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let mime = ct
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
    }
}

/// Performs one network call.
///
/// Connection-level failures map to [`RequestError::NetworkUnavailable`];
/// any received response, whatever its status, is returned as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>) -> HttpResponse {
        HttpResponse {
            status,
            content_type: content_type.map(ToOwned::to_owned),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_success_range() {
        assert!(response(200, None).is_success());
        assert!(response(204, None).is_success());
        assert!(!response(301, None).is_success());
        assert!(!response(405, None).is_success());
    }

    #[test]
    fn test_structured_content_types() {
        assert!(response(200, Some("application/json")).is_structured());
        assert!(response(200, Some("Application/JSON; charset=utf-8")).is_structured());
        assert!(response(200, Some("application/problem+json")).is_structured());
        assert!(!response(200, Some("text/plain")).is_structured());
        assert!(!response(200, None).is_structured());
    }
}
