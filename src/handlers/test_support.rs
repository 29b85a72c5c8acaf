use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::{Config, StoreBackend};
use crate::response::CORS_HEADERS;
use crate::routes;
use crate::state::AppState;
use crate::store::{FailingStore, MemoryProductStore, ProductStore};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> JsonValue {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get("location")
            .map(|value| value.to_str().unwrap())
    }

    pub fn assert_cors(&self) {
        for (name, value) in CORS_HEADERS {
            assert_eq!(self.headers.get(&name).unwrap(), value, "header {}", name);
        }
    }
}

fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        products_table: "products".to_string(),
        spanner: None,
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
    }
}

pub fn app_with(store: Arc<dyn ProductStore>) -> Router {
    routes::router(AppState::new(store, test_config()))
}

pub fn memory_app() -> Router {
    app_with(Arc::new(MemoryProductStore::new()))
}

pub fn failing_app(message: &str) -> Router {
    app_with(Arc::new(FailingStore::new(message)))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse { status, headers, body }
}

pub async fn create_product(app: &Router, id: &str, name: &str, category: &str, price: &str) {
    let response = send(
        app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "productId": id,
            "productName": name,
            "productCategory": category,
            "productPrice": price
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
}
