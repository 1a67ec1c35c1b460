use actix_web::{
    http::{header::HeaderMap, Method, StatusCode},
    test,
    test::TestRequest,
    web,
    App,
};
use chrono::Utc;
use intake_common::Money;
use log::debug;
use order_intake_engine::{
    db_types::{Customer, MenuItem},
    OrderIntakeApi,
    OrderIntakeDatabase,
    PricingPolicy,
};
use serde_json::Value;

use crate::{
    routes::{health, preflight, AutomationOrderRoute, VoiceAgentWebhookRoute},
    server::{cors_headers, json_config},
};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

/// Sends a single request through an app that is wired up the same way the server's is, backed by `db`.
pub async fn send_request<B>(db: B, method: Method, path: &str, body: Option<&str>) -> TestResponse
where B: OrderIntakeDatabase + 'static {
    let _ = env_logger::try_init().ok();
    let api = OrderIntakeApi::new(db, PricingPolicy::default());
    let app = App::new()
        .wrap(cors_headers("*"))
        .app_data(json_config())
        .app_data(web::Data::new(api))
        .service(health)
        .service(preflight)
        .service(AutomationOrderRoute::<B>::new())
        .service(VoiceAgentWebhookRoute::<B>::new());
    let service = test::init_service(app).await;
    let mut req = TestRequest::default().method(method).uri(path);
    if let Some(body) = body {
        req = req.insert_header(("content-type", "application/json")).set_payload(body.to_string());
    }
    debug!("Making request to {path}");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    TestResponse { status, headers, body }
}

pub async fn post_json<B>(db: B, path: &str, body: Value) -> TestResponse
where B: OrderIntakeDatabase + 'static {
    send_request(db, Method::POST, path, Some(&body.to_string())).await
}

pub fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
    MenuItem { id, name: name.to_string(), price: Money::from_major(price), available: true }
}

pub fn customer(id: i64, name: &str, phone: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        address: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
