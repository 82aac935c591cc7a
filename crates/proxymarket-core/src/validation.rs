//! Parameter Validation
//!
//! This module screens caller parameters against the marketplace business
//! rules and builds the wire payloads. Builders are pure: they never touch
//! the network, and the first failing check blocks the request entirely.

use thiserror::Error;

use crate::types::{
    BuyOrder, BuyParams, BuyPayload, ListParams, ListPayload, ProxyType, COUNTRIES, SUBNET_SIZES,
};

/// Errors that can occur while screening parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("count must be greater than zero")]
    CountNotPositive,

    #[error("unknown proxy type '{0}': expected ipv4 or ipv6")]
    UnknownProxyType(String),

    #[error("unknown list filter '{0}': expected ipv4, ipv6 or all")]
    UnknownListFilter(String),

    #[error("duration {duration} is not available for {proxy_type}: available durations are {allowed}")]
    InvalidDuration {
        proxy_type: ProxyType,
        duration: u32,
        allowed: String,
    },

    #[error("country '{0}' is not available: expected one of ru")]
    UnsupportedCountry(String),

    #[error("sort must be 0 (newest first) or 1 (oldest first), got {0}")]
    InvalidSort(u8),
}

/// Build the JSON body for a buy request.
///
/// Checks run in a fixed order and the first failure wins: count, then
/// duration against the per-family whitelist, then country. `promocode`
/// and `subnet` are attach-if-eligible fields: an empty promocode and a
/// subnet that is not in [`SUBNET_SIZES`] (or accompanies an ipv4 order)
/// are dropped from the payload without error.
///
/// # Errors
///
/// Returns `ValidationError` for the first violated rule.
pub fn build_buy_payload(params: &BuyParams) -> Result<BuyPayload, ValidationError> {
    if params.count == 0 {
        return Err(ValidationError::CountNotPositive);
    }

    // The error text is rendered from the same array the check consults,
    // so the message can never drift from the accepted values.
    let durations = params.proxy_type.durations();
    if !durations.contains(&params.duration_days) {
        return Err(ValidationError::InvalidDuration {
            proxy_type: params.proxy_type,
            duration: params.duration_days,
            allowed: join_values(durations),
        });
    }

    if !COUNTRIES.contains(&params.country.as_str()) {
        return Err(ValidationError::UnsupportedCountry(params.country.clone()));
    }

    let promocode = params
        .promocode
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string);

    let subnet = params
        .subnet
        .filter(|size| params.proxy_type == ProxyType::V6 && SUBNET_SIZES.contains(size));

    Ok(BuyPayload {
        order: BuyOrder {
            count: params.count,
            type_code: params.proxy_type.code(),
            duration: params.duration_days,
            country: params.country.clone(),
            promocode,
            subnet,
        },
    })
}

/// Build the JSON body for a list request.
///
/// The filter and sort fields are already screened at the type edges
/// (`ProxyFilter::from_str`, `SortOrder::try_from`) and page numbers
/// cannot go negative, so this currently always succeeds; the `Result`
/// stays as the validation seam.
pub fn build_list_payload(params: &ListParams) -> Result<ListPayload, ValidationError> {
    Ok(ListPayload {
        filter: params.filter,
        page: params.page,
        page_size: params.page_size,
        sort: params.sort.code(),
    })
}

fn join_values(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
