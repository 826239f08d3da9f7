//! Scripted [`HttpTransport`] for exercising the request layer without a network.
//!
//! Replies are looked up by `(method, path)` route first (routes repeat for
//! every matching request), then popped from a FIFO queue. When neither
//! matches, the transport reports the network as unavailable.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::RequestError;
use crate::port::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// One scripted transport outcome, optionally delayed.
#[derive(Debug, Clone)]
pub struct TransportReply {
    outcome: Result<HttpResponse, RequestError>,
    delay: Option<Duration>,
}

impl TransportReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, Some("application/json"), body.to_string().as_bytes())
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::raw(status, Some("text/plain; charset=utf-8"), body.as_bytes())
    }

    pub fn raw(status: u16, content_type: Option<&str>, body: &[u8]) -> Self {
        Self {
            outcome: Ok(HttpResponse {
                status,
                content_type: content_type.map(ToOwned::to_owned),
                body: body.to_vec(),
            }),
            delay: None,
        }
    }

    pub fn unreachable() -> Self {
        Self::error(RequestError::NetworkUnavailable(
            "connection refused".to_string(),
        ))
    }

    pub fn error(error: RequestError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    /// Hang forever; only a caller-side timeout ends the request.
    pub fn hang() -> Self {
        Self::json(200, Value::Null).delayed(Duration::from_secs(3600))
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct Script {
    routes: HashMap<(HttpMethod, String), TransportReply>,
    queue: VecDeque<TransportReply>,
    requests: Vec<HttpRequest>,
}

/// Transport returning scripted replies and recording every request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every `method` request whose URL path equals `path`.
    #[must_use]
    pub fn route(self, method: HttpMethod, path: &str, reply: TransportReply) -> Self {
        self.script
            .lock()
            .routes
            .insert((method, path.to_string()), reply);
        self
    }

    /// Queue a reply for the next unrouted request.
    #[must_use]
    pub fn reply(self, reply: TransportReply) -> Self {
        self.script.lock().queue.push_back(reply);
        self
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.lock().requests.len()
    }

    /// Number of requests seen for `method` on `path`.
    pub fn count_for(&self, method: HttpMethod, path: &str) -> usize {
        self.script
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let reply = {
            let mut script = self.script.lock();
            let key = (request.method, request.url.path().to_string());
            script.requests.push(request);
            match script.routes.get(&key) {
                Some(reply) => Some(reply.clone()),
                None => script.queue.pop_front(),
            }
        };

        let Some(reply) = reply else {
            return Err(RequestError::NetworkUnavailable(
                "no scripted reply".to_string(),
            ));
        };

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.outcome
    }
}
