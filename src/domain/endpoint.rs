//! Service addresses for the HTTP API and the push channel.

use std::fmt;

use url::Url;

/// Resolved HTTP base and push-channel address.
///
/// Immutable once built. The push address mirrors the HTTP scheme
/// (`http` → `ws`, `https` → `wss`) and shares host and port with the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    http_base: Url,
    push_url: Url,
}

impl ServiceEndpoints {
    /// Derive both addresses from an HTTP(S) base and the push-channel path.
    ///
    /// Any query or fragment on the base is discarded.
    #[must_use]
    pub fn derive(mut http_base: Url, push_path: &str) -> Self {
        http_base.set_query(None);
        http_base.set_fragment(None);
        let trimmed = http_base.path().trim_end_matches('/').to_string();
        http_base.set_path(&trimmed);

        let mut push_url = http_base.clone();
        let scheme = if http_base.scheme() == "https" {
            "wss"
        } else {
            "ws"
        };
        // http(s) and ws(s) are all special schemes, so the swap is always permitted.
        let _ = push_url.set_scheme(scheme);
        push_url.set_path(&join_path(&trimmed, push_path));

        Self {
            http_base,
            push_url,
        }
    }

    /// The HTTP(S) base address without a trailing slash.
    #[must_use]
    pub fn http_base(&self) -> &Url {
        &self.http_base
    }

    /// The push-channel address.
    #[must_use]
    pub fn push_url(&self) -> &Url {
        &self.push_url
    }

    /// Build an HTTP address for `path` below the base, keeping any base path prefix.
    #[must_use]
    pub fn http_url(&self, path: &str) -> Url {
        let mut url = self.http_base.clone();
        url.set_path(&join_path(self.http_base.path(), path));
        url
    }
}

impl fmt::Display for ServiceEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (push {})", self.http_base, self.push_url)
    }
}

fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(base: &str) -> ServiceEndpoints {
        ServiceEndpoints::derive(Url::parse(base).unwrap(), "/ws")
    }

    #[test]
    fn test_plain_http_maps_to_ws() {
        let ep = endpoints("http://127.0.0.1:8000");
        assert_eq!(ep.push_url().as_str(), "ws://127.0.0.1:8000/ws");
        assert_eq!(ep.http_url("/health").as_str(), "http://127.0.0.1:8000/health");
    }

    #[test]
    fn test_https_maps_to_wss() {
        let ep = endpoints("https://alerts.example.com");
        assert_eq!(ep.push_url().scheme(), "wss");
        assert_eq!(ep.push_url().as_str(), "wss://alerts.example.com/ws");
    }

    #[test]
    fn test_push_url_shares_host_and_port() {
        let ep = endpoints("https://alerts.example.com:9443/");
        assert_eq!(ep.push_url().host_str(), ep.http_base().host_str());
        assert_eq!(
            ep.push_url().port_or_known_default(),
            ep.http_base().port_or_known_default()
        );
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let ep = endpoints("http://gateway.local/api/");
        assert_eq!(ep.push_url().as_str(), "ws://gateway.local/api/ws");
        assert_eq!(
            ep.http_url("predict").as_str(),
            "http://gateway.local/api/predict"
        );
    }

    #[test]
    fn test_query_is_discarded() {
        let ep = endpoints("http://127.0.0.1:8000/?debug=1");
        assert_eq!(ep.http_base().query(), None);
        assert_eq!(ep.push_url().query(), None);
    }
}
