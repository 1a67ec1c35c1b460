use actix_web::http::{Method, StatusCode};
use intake_common::Money;
use order_intake_engine::{
    db_types::{DeliveryMethod, OrderSource},
    test_utils::memory_store::MemoryStore,
};
use serde_json::{json, Value};

use super::{
    helpers::{post_json, send_request},
    mocks::MockIntakeStore,
};
use crate::server::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS};

const PATH: &str = "/webhook/vapi";

fn store_with_menu() -> MemoryStore {
    let store = MemoryStore::default();
    store.add_menu_item("1. Pepperoni (Large)", Money::from_major(110));
    store.add_menu_item("1. Pepperoni (Small)", Money::from_major(85));
    store.add_menu_item("3. Hawaii", Money::from_major(95));
    store
}

fn end_of_call(analysis: Value) -> Value {
    json!({
        "message": {
            "type": "end-of-call-report",
            "analysis": analysis,
            "call": {"id": "call-123"},
            "transcript": "Hi, I'd like to order a pizza..."
        }
    })
}

#[actix_web::test]
async fn other_events_are_acknowledged() {
    // Every expectation is left unset, so any call into the store fails the test.
    let res = post_json(MockIntakeStore::new(), PATH, json!({"message": {"type": "status-update"}})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"received": true}));
    assert_eq!(res.headers.get("Access-Control-Allow-Methods").unwrap(), CORS_ALLOW_METHODS);
}

#[actix_web::test]
async fn reports_without_analysis_are_acknowledged() {
    let store = store_with_menu();
    let res = post_json(store.clone(), PATH, json!({"message": {"type": "end-of-call-report"}})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({"received": true}));
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn end_of_call_report_creates_an_order() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        end_of_call(json!({
            "customerName": "Lars",
            "customerPhone": "+4587654321",
            "deliveryMethod": "Delivery",
            "deliveryAddress": "Nørregade 2",
            "items": [
                {"name": "Pepperoni (Small)", "quantity": 2, "modifiers": ["extra cheese, well done"]},
                {"item": "Hawaii", "qty": "1", "notes": "Cut in squares"}
            ],
            "allergyInfo": "lactose"
        })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["success"], json!(true));
    // (85 + 10) * 2 + 95
    assert_eq!(body["total_amount"], json!(285));
    assert_eq!(body["items_count"], json!(2));

    let orders = store.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].external_source, OrderSource::Vapi);
    assert_eq!(orders[0].call_id.as_deref(), Some("call-123"));
    assert_eq!(orders[0].delivery_method, DeliveryMethod::Delivery);
    assert_eq!(orders[0].delivery_address.as_deref(), Some("Nørregade 2"));
    assert_eq!(orders[0].allergy_info.as_deref(), Some("lactose"));
    let items = store.order_items();
    assert_eq!(items[0].item_name, "1. Pepperoni (Small) + extra cheese, well done");
    assert_eq!(items[0].unit_price, Money::from_major(95));
    assert_eq!(items[1].special_instructions.as_deref(), Some("Cut in squares"));
    let customers = store.customers();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Lars");
    assert_eq!(customers[0].address.as_deref(), Some("Nørregade 2"));
}

#[actix_web::test]
async fn unknown_callers_keep_their_stored_name() {
    let store = store_with_menu();
    let first = json!({"customerName": "Lars", "customerPhone": "+4587654321", "items": [{"name": "Hawaii"}]});
    assert_eq!(post_json(store.clone(), PATH, end_of_call(first)).await.status, StatusCode::OK);
    let second = json!({"customerPhone": "+4587654321", "items": [{"name": "Hawaii", "quantity": 1}]});
    assert_eq!(post_json(store.clone(), PATH, end_of_call(second)).await.status, StatusCode::OK);
    let customers = store.customers();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Lars");
    assert_eq!(store.orders().len(), 2);
}

#[actix_web::test]
async fn report_without_phone_is_rejected() {
    let store = store_with_menu();
    let res = post_json(store.clone(), PATH, end_of_call(json!({"customerName": "Lars", "items": [{"name": "Hawaii"}]})))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Customer phone number is required"}));
    assert_eq!(store.call_count(), 0);
}

#[actix_web::test]
async fn lines_without_names_are_skipped() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        end_of_call(json!({"customerPhone": "+4587654321", "order_items": [{"quantity": 2}, {"size": "large"}]})),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({"error": "Order must contain at least one item"}));
}

#[actix_web::test]
async fn zero_quantity_is_rejected() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        end_of_call(json!({"customerPhone": "+4587654321", "items": [{"name": "Hawaii", "quantity": 0}]})),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(store.orders().is_empty());
}

#[actix_web::test]
async fn spoken_quantities_use_the_leading_number() {
    let store = store_with_menu();
    let res = post_json(
        store.clone(),
        PATH,
        end_of_call(json!({
            "customerPhone": "+4587654321",
            "items": [{"name": "Hawaii", "qty": "2 pizzas"}, {"name": "Pepperoni (Large)", "quantity": "2.5"}]
        })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    // 95 * 2 + 110 * 2
    assert_eq!(res.json()["total_amount"], json!(410));
    let items = store.order_items();
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[1].quantity, 2);
}

#[actix_web::test]
async fn preflight() {
    let res = send_request(MockIntakeStore::new(), Method::OPTIONS, PATH, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.is_empty());
    assert_eq!(res.headers.get("Access-Control-Allow-Origin").unwrap(), "*");
    assert_eq!(res.headers.get("Access-Control-Allow-Headers").unwrap(), CORS_ALLOW_HEADERS);
    assert_eq!(res.headers.get("Access-Control-Allow-Methods").unwrap(), CORS_ALLOW_METHODS);
}

#[actix_web::test]
async fn health() {
    let res = send_request(MockIntakeStore::new(), Method::GET, "/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "👍️\n");
}
