//! # proxymarket-core
//!
//! Parameter screening and wire payloads for the proxy.market purchase API.
//!
//! This crate provides:
//! - Catalog constants and enums for proxy families, list filters and sort order
//! - [`BuyParams`] / [`ListParams`] and the payload builders that screen them
//! - A validation error for every business rule
//!
//! ## Example
//!
//! ```
//! use proxymarket_core::{build_buy_payload, BuyParams};
//!
//! let params = BuyParams::new(3);
//! let payload = build_buy_payload(&params).unwrap();
//! assert_eq!(payload.order.count, 3);
//! ```

pub mod types;
pub mod validation;

// Re-exports for convenience
pub use types::*;
pub use validation::*;
