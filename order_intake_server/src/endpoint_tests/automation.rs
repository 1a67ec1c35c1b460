use actix_web::http::StatusCode;
use chrono::Utc;
use intake_common::Money;
use order_intake_engine::{
    db_types::{DeliveryMethod, Order, OrderSource},
    test_utils::memory_store::{MemoryStore, StoreFault},
    IntakeStoreError,
};
use serde_json::json;

use super::{
    helpers::{customer, menu_item, post_json, send_request},
    mocks::MockIntakeStore,
};
use crate::errors::REJECTED_ITEMS_MESSAGE;

const PATH: &str = "/webhook/n8n";

fn store_with_menu() -> MemoryStore {
    let store = MemoryStore::default();
    store.add_menu_item("4. Margherita (Large)", Money::from_major(95));
    store.add_menu_item("4. Margherita (Small)", Money::from_major(75));
    store.add_menu_item("3. Hawaii", Money::from_major(95));
    store
}

#[actix_web::test]
async fn accepted_order() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        json!({
            "customer": {"name": "Mette", "phone": "+4512345678"},
            "items": [{"name": "4. Margherita (Large)", "quantity": 2}],
            "deliveryMethod": "pickup"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total_amount"], json!(190));
    assert_eq!(body["items_count"], json!(1));
    let order_number = body["order_number"].as_str().unwrap();
    assert_eq!(order_number.len(), 13);
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");

    let orders = store.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(body["order_id"], json!(orders[0].id));
    assert_eq!(orders[0].order_number, order_number);
    assert_eq!(orders[0].external_source, OrderSource::N8n);
    let items = store.order_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, Money::from_major(95));
}

#[actix_web::test]
async fn delivery_falls_back_to_the_customer_address() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        json!({
            "customer": {"name": "Mette", "phone": "+4512345678", "address": "Vestergade 1"},
            "items": [{"name": "Hawaii", "quantity": "1", "modifiers": ["extra cheese"]}],
            "deliveryMethod": "delivery"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["total_amount"], json!(105));
    let orders = store.orders();
    assert_eq!(orders[0].delivery_method, DeliveryMethod::Delivery);
    assert_eq!(orders[0].delivery_address.as_deref(), Some("Vestergade 1"));
    assert_eq!(store.order_items()[0].item_name, "3. Hawaii + extra cheese");
}

#[actix_web::test]
async fn missing_phone_is_rejected() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        json!({"customer": {"name": "Mette"}, "items": [{"name": "Hawaii", "quantity": 1}]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Customer phone number is required"}));
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn items_must_be_a_non_empty_list() {
    let store = store_with_menu();
    let res = post_json(store.clone(), PATH, json!({"customer": {"phone": "+4512345678"}, "items": "one pizza"})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Order must contain at least one item"}));
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn delivery_without_any_address_is_rejected() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        json!({
            "customer": {"phone": "+4512345678"},
            "items": [{"name": "Hawaii", "quantity": 1}],
            "deliveryMethod": "delivery",
            "deliveryAddress": ""
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Delivery orders must include an address"}));
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn absurd_quantities_are_rejected_before_pricing() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        json!({"customer": {"phone": "+4512345678"}, "items": [{"name": "Hawaii", "quantity": 1e20}]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Item \"Hawaii\" has an invalid quantity (9223372036854775807)"}));
    assert_eq!(store.call_count(), 0);

    let res = post_json(
        store.clone(),
        PATH,
        json!({"customer": {"phone": "+4512345678"}, "items": [{"name": "Hawaii", "quantity": "1000"}]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Item \"Hawaii\" has an invalid quantity (1000)"}));
    assert!(store.orders().is_empty());
}

#[actix_web::test]
async fn unmatched_items_reject_the_whole_order() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        json!({
            "customer": {"phone": "+4512345678"},
            "items": [{"name": "Hawaii", "quantity": 1}, {"name": "Calzone", "quantity": 1}]
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json(),
        json!({"error": "Order validation failed", "failed_items": ["Calzone"], "message": REJECTED_ITEMS_MESSAGE})
    );
    assert!(store.orders().is_empty());
    assert!(store.customers().is_empty());
}

#[actix_web::test]
async fn placeholder_prices_are_rejected() {
    let store = store_with_menu();
    store.add_menu_item("9. Chef's Special", Money::from_minor(1));
    let res = post_json(
        store.clone(),
        PATH,
        json!({"customer": {"phone": "+4512345678"}, "items": [{"name": "Chef's Special", "quantity": 1}]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["failed_items"], json!(["Chef's Special (invalid price: 0.01)"]));
    assert!(store.orders().is_empty());
}

#[actix_web::test]
async fn malformed_body() {
    let store = store_with_menu();
    let res = send_request(store.clone(), actix_web::http::Method::POST, PATH, Some("{\"customer\": ")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let error = res.json()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invalid request body."), "{error}");
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn menu_fetch_failure_is_a_server_error() {
    let store = store_with_menu();
    store.fail(StoreFault::MenuFetch);
    let res = post_json(
        store.clone(),
        PATH,
        json!({"customer": {"phone": "+4512345678"}, "items": [{"name": "Hawaii", "quantity": 1}]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json(), json!({"error": "Failed to fetch menu items"}));
}

#[actix_web::test]
async fn failed_items_remove_the_order_header() {
    let mut db = MockIntakeStore::new();
    db.expect_fetch_available_menu_items().times(1).returning(|| Ok(vec![menu_item(1, "3. Hawaii", 95)]));
    db.expect_fetch_customer_by_phone().times(1).returning(|phone| Ok(Some(customer(7, "Mette", phone))));
    db.expect_update_customer().never();
    db.expect_insert_customer().never();
    db.expect_insert_order().times(1).returning(|o| {
        Ok(Order {
            id: 42,
            order_number: o.order_number,
            customer_id: o.customer_id,
            delivery_method: o.delivery_method,
            delivery_address: o.delivery_address,
            payment_method: o.payment_method,
            total_amount: o.total_amount,
            notes: o.notes,
            allergy_info: o.allergy_info,
            external_source: o.external_source,
            call_id: o.call_id,
            order_status: o.order_status,
            payment_status: o.payment_status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    });
    db.expect_insert_order_items()
        .withf(|id, items| *id == 42 && items.len() == 1)
        .times(1)
        .returning(|_, _| Err(IntakeStoreError::DatabaseError("disk I/O error".into())));
    db.expect_delete_order().withf(|id| *id == 42).times(1).returning(|_| Ok(true));

    let res = post_json(
        db,
        PATH,
        json!({"customer": {"name": "Mette", "phone": "+4512345678"}, "items": [{"name": "Hawaii", "quantity": 1}]}),
    )
    .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json(), json!({"error": "Failed to create order items"}));
}
