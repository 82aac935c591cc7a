//! Reqwest-based POST transport with per-call diagnostics

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::redirect::Policy;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Headers sent with every request unless the caller overrides them.
const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Accept", "application/json"),
    ("Content-Type", "application/json"),
];

/// Transport configuration.
///
/// The legacy client shipped with peer verification disabled; here the
/// permissive mode is an explicit opt-out via `verify_tls`.
///
/// # Examples
///
/// ```toml
/// [transport]
/// timeout_secs = 30
/// connect_timeout_secs = 30
/// max_redirects = 5
/// verify_tls = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Upper bound on followed redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Verify the server certificate chain.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            verify_tls: default_verify_tls(),
        }
    }
}

impl TransportConfig {
    /// Returns the total timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the connect timeout as Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_verify_tls() -> bool {
    true
}

/// Response headers keyed by normalized name.
///
/// Names are lower-cased with `-` rewritten to `_` and values trimmed.
/// This replaces the legacy per-header mutation callback with a plain
/// value accumulated per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag(BTreeMap<String, String>);

impl HeaderBag {
    pub fn insert(&mut self, name: &str, value: &str) {
        self.0
            .insert(normalize_header_name(name), value.trim().to_string());
    }

    /// Fold one raw header line into the bag.
    ///
    /// The line is split on the first colon; lines without one (status
    /// lines, blank separators) are ignored.
    pub fn insert_line(&mut self, line: &str) {
        if let Some((name, value)) = line.split_once(':') {
            self.insert(name, value);
        }
    }

    /// Look up a header by any casing of its name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&normalize_header_name(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

fn normalize_header_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// Low-level transfer details recorded alongside the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportInfo {
    /// Wall-clock time spent on the round trip, body read included.
    pub elapsed: Duration,
    /// Peer address the connection was made to, when known.
    pub remote_addr: Option<SocketAddr>,
}

/// The request half of an [`Exchange`]. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub uri: String,
    pub method: &'static str,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

/// The response half of an [`Exchange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub status: u16,
    pub headers: HeaderBag,
    pub body: String,
}

/// Diagnostics for one request/response round trip.
///
/// Built fresh per call and returned to the caller; the transport also
/// retains a copy of the most recent exchange for later inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub request: RequestRecord,
    /// `None` when the transport failed before any response arrived.
    pub response: Option<ResponseRecord>,
    /// Transport-level error description, if any.
    pub error: Option<String>,
    /// Transfer details, populated even when the round trip failed.
    pub info: TransportInfo,
}

impl Exchange {
    /// Raw response body, if the round trip completed.
    ///
    /// An HTTP error status still yields a body here; `None` means the
    /// transport itself failed (DNS, refused connection, timeout, or a
    /// broken body read).
    pub fn body(&self) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        self.response.as_ref().map(|record| record.body.as_str())
    }
}

/// POST-only HTTP transport for the marketplace API.
///
/// Each [`send`](HttpTransport::send) call performs exactly one POST with
/// a JSON body. Transport-level failures are recorded on the returned
/// [`Exchange`] instead of erroring out, so callers decide how to surface
/// them.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
    last: Mutex<Option<Exchange>>,
}

impl HttpTransport {
    /// Transport with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&TransportConfig::default())
    }

    /// Transport with explicit timeouts, redirect bound and TLS mode.
    pub fn with_config(config: &TransportConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .expect("reqwest client construction failed");

        Self {
            client,
            config: config.clone(),
            last: Mutex::new(None),
        }
    }

    /// Effective transport options.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Diagnostics for the most recent call, if any.
    ///
    /// Last write wins when the transport is shared across tasks; the
    /// per-call [`Exchange`] returned by [`send`](HttpTransport::send) is
    /// the reliable record.
    pub fn last_exchange(&self) -> Option<Exchange> {
        self.last.lock().expect("exchange lock poisoned").clone()
    }

    /// Execute exactly one POST with a JSON body and merged headers.
    ///
    /// `extra_headers` are merged over the defaults (`Accept` and
    /// `Content-Type`: `application/json`); the caller wins on a
    /// case-insensitive name collision.
    pub async fn send(
        &self,
        uri: &str,
        parameters: &serde_json::Value,
        extra_headers: &[(&str, &str)],
    ) -> Exchange {
        let headers = merge_headers(extra_headers);
        let body = parameters.to_string();

        let request = RequestRecord {
            uri: uri.to_string(),
            method: "POST",
            body: body.clone(),
            headers: headers.clone(),
        };

        debug!(uri, bytes = body.len(), "dispatching POST");

        let mut builder = self.client.post(uri).body(body);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let exchange = match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let remote_addr = response.remote_addr();
                let mut bag = HeaderBag::default();
                for (name, value) in response.headers() {
                    bag.insert(name.as_str(), value.to_str().unwrap_or(""));
                }

                match response.text().await {
                    Ok(text) => {
                        debug!(status, bytes = text.len(), "response received");
                        Exchange {
                            request,
                            response: Some(ResponseRecord {
                                status,
                                headers: bag,
                                body: text,
                            }),
                            error: None,
                            info: TransportInfo {
                                elapsed: started.elapsed(),
                                remote_addr,
                            },
                        }
                    }
                    // Status and headers arrived but the body read broke off;
                    // keep what we have and mark the exchange failed.
                    Err(err) => {
                        warn!(status, error = %err, "failed to read response body");
                        Exchange {
                            request,
                            response: Some(ResponseRecord {
                                status,
                                headers: bag,
                                body: String::new(),
                            }),
                            error: Some(err.to_string()),
                            info: TransportInfo {
                                elapsed: started.elapsed(),
                                remote_addr,
                            },
                        }
                    }
                }
            }
            Err(err) => {
                warn!(uri, error = %err, "transport failure");
                Exchange {
                    request,
                    response: None,
                    error: Some(err.to_string()),
                    info: TransportInfo {
                        elapsed: started.elapsed(),
                        remote_addr: None,
                    },
                }
            }
        };

        *self.last.lock().expect("exchange lock poisoned") = Some(exchange.clone());
        exchange
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge caller headers over the defaults; the caller wins on a
/// case-insensitive name collision.
fn merge_headers(extra: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    for (name, value) in extra {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.to_string(),
            None => merged.push((name.to_string(), value.to_string())),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bag_normalizes_names() {
        let mut bag = HeaderBag::default();
        bag.insert("Content-Type", " text/plain ");
        assert_eq!(bag.get("content_type"), Some("text/plain"));
        assert_eq!(bag.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_header_bag_folds_raw_lines() {
        let mut bag = HeaderBag::default();
        bag.insert_line("Content-Type: text/plain");
        bag.insert_line("X-Foo:bar");
        assert_eq!(bag.get("content_type"), Some("text/plain"));
        assert_eq!(bag.get("x_foo"), Some("bar"));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_header_bag_ignores_lines_without_colon() {
        let mut bag = HeaderBag::default();
        bag.insert_line("HTTP/1.1 200 OK");
        bag.insert_line("");
        assert!(bag.is_empty());
    }

    #[test]
    fn test_header_bag_splits_on_first_colon_only() {
        let mut bag = HeaderBag::default();
        bag.insert_line("Location: https://proxy.market/dev-api");
        assert_eq!(bag.get("location"), Some("https://proxy.market/dev-api"));
    }

    #[test]
    fn test_merge_headers_defaults() {
        let merged = merge_headers(&[]);
        assert_eq!(
            merged,
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_headers_caller_overrides_default() {
        let merged = merge_headers(&[("accept", "text/html")]);
        assert_eq!(merged[0], ("Accept".to_string(), "text/html".to_string()));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_headers_appends_new_entries() {
        let merged = merge_headers(&[("X-Trace", "abc")]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2], ("X-Trace".to_string(), "abc".to_string()));
    }

    #[test]
    fn test_config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_redirects, 5);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_config_partial_deserialization_fills_defaults() {
        let config: TransportConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.max_redirects, 5);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_transport_construction_with_permissive_tls() {
        let config = TransportConfig {
            verify_tls: false,
            ..TransportConfig::default()
        };
        let transport = HttpTransport::with_config(&config);
        assert!(!transport.config().verify_tls);
        assert!(transport.last_exchange().is_none());
    }

    #[test]
    fn test_exchange_body_hidden_on_transport_error() {
        let exchange = Exchange {
            request: RequestRecord {
                uri: "https://proxy.market/dev-api/list/key".to_string(),
                method: "POST",
                body: "{}".to_string(),
                headers: vec![],
            },
            response: Some(ResponseRecord {
                status: 200,
                headers: HeaderBag::default(),
                body: String::new(),
            }),
            error: Some("connection reset".to_string()),
            info: TransportInfo::default(),
        };
        assert_eq!(exchange.body(), None);
    }
}
