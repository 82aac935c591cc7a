//! Marketplace client built on [`HttpTransport`]

use proxymarket_core::{
    build_buy_payload, build_list_payload, BuyParams, ListParams, PurchaseResult,
    INTERNAL_ERROR_STATUS,
};
use serde_json::Value;
use tracing::debug;

use crate::error::MarketError;
use crate::transport::HttpTransport;

/// Production endpoint for the purchase API.
pub const DEFAULT_BASE_URL: &str = "https://proxy.market/dev-api";

const LIST_PATH: &str = "list";
const BUY_PATH: &str = "buy-proxy";

/// Client for the proxy.market purchase API.
///
/// Holds one transport and the caller's API key. The key is embedded in
/// every request path, so operations refuse to run with a blank key.
///
/// # Example
///
/// ```ignore
/// use proxymarket_core::BuyParams;
/// use proxymarket_http::MarketClient;
///
/// let client = MarketClient::new("my-api-key");
/// let receipt = client.buy_proxy(&BuyParams::new(5)).await?;
/// ```
#[derive(Debug)]
pub struct MarketClient {
    transport: HttpTransport,
    base_url: String,
    api_key: String,
}

impl MarketClient {
    /// Client with a default transport against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::new(), api_key)
    }

    /// Client with a custom transport.
    pub fn with_transport(transport: HttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different endpoint, e.g. a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transport used by this client, for diagnostics inspection.
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Purchase proxies.
    ///
    /// Validation failures surface before any network traffic. A decoded
    /// response carrying `status == 500` is the server's failure signal
    /// and maps to [`MarketError::Unsuccessful`]; anything else is
    /// returned as the purchase result under the billing wire key.
    pub async fn buy_proxy(&self, params: &BuyParams) -> Result<PurchaseResult, MarketError> {
        self.require_api_key()?;
        let payload = build_buy_payload(params)?;
        let decoded = self.post(BUY_PATH, serde_json::to_value(&payload)?).await?;

        if decoded.get("status").and_then(Value::as_i64) == Some(INTERNAL_ERROR_STATUS) {
            let message = decoded
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("internal server error")
                .to_string();
            return Err(MarketError::Unsuccessful(message));
        }

        Ok(PurchaseResult { billing: decoded })
    }

    /// List owned proxies.
    ///
    /// The success payload shape is opaque to this client; the `data`
    /// value inside the `list` envelope is returned as-is. An envelope
    /// carrying an `error` flag with a message maps to
    /// [`MarketError::Server`], and anything unrecognized falls through
    /// to a generic server error.
    pub async fn list_proxy(&self, params: &ListParams) -> Result<Value, MarketError> {
        self.require_api_key()?;
        let payload = build_list_payload(params)?;
        let decoded = self.post(LIST_PATH, serde_json::to_value(payload)?).await?;

        if !decoded.get("success").map(is_truthy).unwrap_or(false) {
            return Err(MarketError::Unsuccessful(
                "invalid or unsuccessful response".to_string(),
            ));
        }

        if let Some(list) = decoded.get("list") {
            if list.get("error").map(is_truthy).unwrap_or(false) {
                if let Some(message) = list.get("message").and_then(Value::as_str) {
                    return Err(MarketError::Server(message.to_string()));
                }
            }

            if let Some(data) = list.get("data") {
                return Ok(data.clone());
            }
        }

        Err(MarketError::Server("Unknown API error".to_string()))
    }

    fn require_api_key(&self) -> Result<(), MarketError> {
        if self.api_key.trim().is_empty() {
            return Err(MarketError::MissingApiKey);
        }
        Ok(())
    }

    fn endpoint(&self, segment: &str) -> String {
        format!("{}/{}/{}", self.base_url, segment, self.api_key)
    }

    async fn post(&self, segment: &str, payload: Value) -> Result<Value, MarketError> {
        let uri = self.endpoint(segment);
        let exchange = self.transport.send(&uri, &payload, &[]).await;

        match exchange.body() {
            Some(body) => {
                debug!(segment, bytes = body.len(), "decoding response");
                Ok(serde_json::from_str(body)?)
            }
            None => {
                let reason = exchange
                    .error
                    .clone()
                    .unwrap_or_else(|| "no response received".to_string());
                Err(MarketError::Transport(reason))
            }
        }
    }
}

/// The service is loose about boolean flags; accept JSON `true` and any
/// non-zero number.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = MarketClient::new("key-123");
        assert_eq!(client.base_url(), "https://proxy.market/dev-api");
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = MarketClient::new("key-123").with_base_url("http://127.0.0.1:9999/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_endpoint_embeds_api_key() {
        let client = MarketClient::new("key-123");
        assert_eq!(
            client.endpoint("buy-proxy"),
            "https://proxy.market/dev-api/buy-proxy/key-123"
        );
        assert_eq!(
            client.endpoint("list"),
            "https://proxy.market/dev-api/list/key-123"
        );
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let client = MarketClient::new("   ");
        assert!(matches!(
            client.require_api_key(),
            Err(MarketError::MissingApiKey)
        ));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(null)));
    }
}
