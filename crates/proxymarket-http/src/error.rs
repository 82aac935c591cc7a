//! Error types for the proxy.market client

use proxymarket_core::ValidationError;
use thiserror::Error;

/// Errors surfaced by client operations.
///
/// Validation failures are raised before any network traffic. Transport
/// failures carry the description recorded on the exchange diagnostics.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ValidationError),

    #[error("api key must not be empty")]
    MissingApiKey,

    #[error("transport failed: {0}")]
    Transport(String),

    #[error("server reported failure: {0}")]
    Unsuccessful(String),

    #[error("unexpected server payload: {0}")]
    Server(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
