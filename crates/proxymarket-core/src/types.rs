//! Core Types
//!
//! This module contains the catalog constants and wire-facing types for the
//! proxy.market purchase API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Durations (in days) accepted for ipv4 purchases.
pub const DURATIONS_IPV4: [u32; 5] = [30, 60, 90, 180, 360];

/// Durations (in days) accepted for ipv6 purchases.
pub const DURATIONS_IPV6: [u32; 8] = [3, 7, 14, 30, 60, 90, 180, 360];

/// Subnet sizes that may accompany an ipv6 purchase.
pub const SUBNET_SIZES: [u32; 2] = [32, 29];

/// Countries currently offered by the marketplace.
pub const COUNTRIES: [&str; 1] = ["ru"];

/// `status` value the server places in a buy response to signal failure.
pub const INTERNAL_ERROR_STATUS: i64 = 500;

/// Proxy family offered for purchase.
///
/// The wire protocol addresses families by numeric code, not by name;
/// see [`ProxyType::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyType {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl ProxyType {
    /// Numeric code used in buy payloads (100 for ipv4, 101 for ipv6).
    pub fn code(self) -> u16 {
        match self {
            ProxyType::V4 => 100,
            ProxyType::V6 => 101,
        }
    }

    /// Duration whitelist for this family.
    pub fn durations(self) -> &'static [u32] {
        match self {
            ProxyType::V4 => &DURATIONS_IPV4,
            ProxyType::V6 => &DURATIONS_IPV6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::V4 => "ipv4",
            ProxyType::V6 => "ipv6",
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(ProxyType::V4),
            "ipv6" => Ok(ProxyType::V6),
            other => Err(ValidationError::UnknownProxyType(other.to_string())),
        }
    }
}

/// Filter for listing owned proxies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyFilter {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl ProxyFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyFilter::V4 => "ipv4",
            ProxyFilter::V6 => "ipv6",
            ProxyFilter::All => "all",
        }
    }
}

impl fmt::Display for ProxyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(ProxyFilter::V4),
            "ipv6" => Ok(ProxyFilter::V6),
            "all" => Ok(ProxyFilter::All),
            other => Err(ValidationError::UnknownListFilter(other.to_string())),
        }
    }
}

/// Listing order, encoded on the wire as 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest purchases first (wire code 0).
    #[default]
    NewestFirst,
    /// Oldest purchases first (wire code 1).
    OldestFirst,
}

impl SortOrder {
    pub fn code(self) -> u8 {
        match self {
            SortOrder::NewestFirst => 0,
            SortOrder::OldestFirst => 1,
        }
    }
}

impl TryFrom<u8> for SortOrder {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SortOrder::NewestFirst),
            1 => Ok(SortOrder::OldestFirst),
            other => Err(ValidationError::InvalidSort(other)),
        }
    }
}

/// Parameters for a purchase request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyParams {
    pub count: u32,
    pub proxy_type: ProxyType,
    pub duration_days: u32,
    pub country: String,
    /// Included in the payload only when non-empty after trimming.
    pub promocode: Option<String>,
    /// Attached only for ipv6 orders with a size in [`SUBNET_SIZES`].
    pub subnet: Option<u32>,
}

impl BuyParams {
    /// Buy `count` proxies with the marketplace defaults:
    /// ipv4, 30 days, country "ru", no promocode, no subnet.
    pub fn new(count: u32) -> Self {
        Self {
            count,
            proxy_type: ProxyType::V4,
            duration_days: 30,
            country: COUNTRIES[0].to_string(),
            promocode: None,
            subnet: None,
        }
    }
}

/// Parameters for a list request.
///
/// The defaults (all families, page 0, page size 0, newest first) ask the
/// server for everything in one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: ProxyFilter,
    pub page: u32,
    pub page_size: u32,
    pub sort: SortOrder,
}

/// JSON body for a buy request.
///
/// The marketplace nests every order field under the `PurchaseBilling`
/// key; responses use the same nesting, see [`PurchaseResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyPayload {
    #[serde(rename = "PurchaseBilling")]
    pub order: BuyOrder,
}

/// Order fields inside a [`BuyPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyOrder {
    pub count: u32,
    /// Numeric family code, see [`ProxyType::code`].
    #[serde(rename = "type")]
    pub type_code: u16,
    pub duration: u32,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promocode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<u32>,
}

/// JSON body for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPayload {
    #[serde(rename = "type")]
    pub filter: ProxyFilter,
    pub page: u32,
    pub page_size: u32,
    pub sort: u8,
}

/// Decoded buy response, nested under the same wire key as the request.
///
/// The billing payload shape is owned by the server and left opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResult {
    #[serde(rename = "PurchaseBilling")]
    pub billing: serde_json::Value,
}
