//! Wire-shape tests for payloads and results

use pretty_assertions::assert_eq;
use proxymarket_core::*;
use serde_json::json;

#[test]
fn buy_payload_nests_order_under_wire_key() {
    let params = BuyParams::new(5);
    let payload = build_buy_payload(&params).unwrap();

    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "PurchaseBilling": {
                "count": 5,
                "type": 100,
                "duration": 30,
                "country": "ru",
            }
        })
    );
}

#[test]
fn buy_payload_substitutes_numeric_type_code() {
    let params = BuyParams {
        proxy_type: ProxyType::V6,
        duration_days: 7,
        ..BuyParams::new(1)
    };
    let payload = build_buy_payload(&params).unwrap();
    let value = serde_json::to_value(&payload).unwrap();

    assert_eq!(value["PurchaseBilling"]["type"], json!(101));
    // The human-readable name never reaches the wire.
    assert_eq!(value["PurchaseBilling"].get("ipv6"), None);
}

#[test]
fn omitted_fields_are_absent_not_null() {
    let params = BuyParams {
        proxy_type: ProxyType::V6,
        subnet: Some(99),
        promocode: Some(String::new()),
        ..BuyParams::new(1)
    };
    let payload = build_buy_payload(&params).unwrap();
    let value = serde_json::to_value(&payload).unwrap();
    let order = value["PurchaseBilling"].as_object().unwrap();

    assert!(!order.contains_key("subnet"));
    assert!(!order.contains_key("promocode"));
}

#[test]
fn eligible_subnet_and_promocode_serialize() {
    let params = BuyParams {
        proxy_type: ProxyType::V6,
        duration_days: 14,
        promocode: Some("SPRING".to_string()),
        subnet: Some(29),
        ..BuyParams::new(2)
    };
    let payload = build_buy_payload(&params).unwrap();

    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "PurchaseBilling": {
                "count": 2,
                "type": 101,
                "duration": 14,
                "country": "ru",
                "promocode": "SPRING",
                "subnet": 29,
            }
        })
    );
}

#[test]
fn list_payload_shape() {
    let payload = build_list_payload(&ListParams::default()).unwrap();

    assert_eq!(
        serde_json::to_value(payload).unwrap(),
        json!({
            "type": "all",
            "page": 0,
            "page_size": 0,
            "sort": 0,
        })
    );
}

#[test]
fn list_filter_serializes_by_name() {
    let payload = build_list_payload(&ListParams {
        filter: ProxyFilter::V4,
        sort: SortOrder::OldestFirst,
        ..ListParams::default()
    })
    .unwrap();
    let value = serde_json::to_value(payload).unwrap();

    assert_eq!(value["type"], json!("ipv4"));
    assert_eq!(value["sort"], json!(1));
}

#[test]
fn purchase_result_round_trips_wire_key() {
    let raw = json!({
        "PurchaseBilling": {
            "order_id": 42,
            "price": "12.50",
        }
    });
    let result: PurchaseResult = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(result.billing["order_id"], json!(42));
    assert_eq!(serde_json::to_value(&result).unwrap(), raw);
}

#[test]
fn proxy_type_display_matches_wire_names() {
    assert_eq!(ProxyType::V4.to_string(), "ipv4");
    assert_eq!(ProxyType::V6.to_string(), "ipv6");
    assert_eq!(ProxyFilter::All.to_string(), "all");
}

#[test]
fn catalog_codes_are_stable() {
    assert_eq!(ProxyType::V4.code(), 100);
    assert_eq!(ProxyType::V6.code(), 101);
    assert_eq!(SortOrder::NewestFirst.code(), 0);
    assert_eq!(SortOrder::OldestFirst.code(), 1);
    assert_eq!(INTERNAL_ERROR_STATUS, 500);
}
