//! Timeout-bounded request layer.
//!
//! Wraps an [`HttpTransport`] with a per-call deadline and normalizes every
//! outcome into a [`Body`] or a [`RequestError`]. There are no retries here;
//! retry policy belongs to callers.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::RequestError;
use crate::port::{HttpRequest, HttpResponse, HttpTransport};

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The response declared a JSON content type.
    Structured(Value),
    /// Anything else, as text.
    Text(String),
}

impl Body {
    /// The structured value, if the body was JSON.
    #[must_use]
    pub fn into_structured(self) -> Option<Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// The body as JSON, parsing text bodies that were sent without a JSON
    /// content type.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(text) => serde_json::from_str(&text).ok(),
        }
    }
}

/// Issues timeout-bounded requests through a transport.
#[derive(Clone)]
pub struct RequestGateway {
    transport: Arc<dyn HttpTransport>,
}

impl RequestGateway {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send `request`, aborting it if no response arrives within `timeout`.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Timeout`] when the deadline fires first; the
    ///   in-flight call is dropped.
    /// - [`RequestError::NetworkUnavailable`] from the transport.
    /// - [`RequestError::HttpStatus`] for any non-2xx status.
    /// - [`RequestError::MalformedPayload`] when a JSON body fails to decode.
    pub async fn request(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<Body, RequestError> {
        let method = request.method;
        let url = request.url.clone();
        trace!(%method, %url, timeout_ms = timeout.as_millis() as u64, "Sending request");

        let response = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(result) => result?,
            Err(_) => {
                debug!(%method, %url, "Request timed out");
                return Err(RequestError::Timeout);
            }
        };

        if !response.is_success() {
            debug!(%method, %url, status = response.status, "Non-success status");
            return Err(RequestError::HttpStatus(response.status));
        }

        decode(response)
    }
}

fn decode(response: HttpResponse) -> Result<Body, RequestError> {
    if response.is_structured() {
        serde_json::from_slice(&response.body)
            .map(Body::Structured)
            .map_err(|e| RequestError::MalformedPayload(e.to_string()))
    } else {
        Ok(Body::Text(String::from_utf8_lossy(&response.body).into_owned()))
    }
}
