//! # proxymarket-http
//!
//! HTTP transport and client for the proxy.market purchase API.
//!
//! This crate provides:
//! - A POST-only reqwest transport that records per-call diagnostics
//! - [`MarketClient`] with the two marketplace operations: buy and list
//!
//! ## Example
//!
//! ```ignore
//! use proxymarket_core::BuyParams;
//! use proxymarket_http::MarketClient;
//!
//! let client = MarketClient::new("my-api-key");
//! let receipt = client.buy_proxy(&BuyParams::new(5)).await?;
//! println!("{}", receipt.billing);
//! ```

mod client;
mod error;
mod transport;

pub use client::{MarketClient, DEFAULT_BASE_URL};
pub use error::MarketError;
pub use transport::{
    Exchange, HeaderBag, HttpTransport, RequestRecord, ResponseRecord, TransportConfig,
    TransportInfo,
};
