//! reqwest-backed HTTP transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method};
use tracing::{trace, warn};

use crate::error::RequestError;
use crate::port::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Performs one HTTP call per request with a shared connection pool.
///
/// No client-level timeout is set; deadlines belong to the request gateway.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: HttpClient,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        let http = HttpClient::builder()
            .user_agent(concat!("mediguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self { http }
    }

    #[must_use]
    pub fn with_client(http: HttpClient) -> Self {
        Self { http }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Options => Method::OPTIONS,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        trace!(method = %request.method, url = %request.url, "HTTP call");

        let mut builder = self.http.request(method(request.method), request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RequestError::NetworkUnavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::NetworkUnavailable(e.to_string()))?;

        Ok(HttpResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
