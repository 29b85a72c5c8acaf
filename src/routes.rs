// Route path constants - single source of truth for all API paths

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const OPENAPI: &str = "/api-docs/openapi.json";
pub const PRODUCTS: &str = "/products";
pub const PRODUCT: &str = "/products/{productId}";
pub const PRODUCTS_BY_CATEGORY: &str = "/products/categories/{categoryName}";

// Unknown methods on a known path fall through to the 404 handler, not 405.
// HEAD is pinned explicitly, otherwise axum serves it from the GET handler.
fn methods(router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    router
        .head(handlers::not_found_handler)
        .fallback(handlers::not_found_handler)
}

/// Build the dispatcher: one handler per (path template, method) pair
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            PRODUCTS,
            methods(get(handlers::list_handler).post(handlers::create_handler)),
        )
        .route(
            PRODUCT,
            methods(
                get(handlers::get_handler)
                    .patch(handlers::update_handler)
                    .delete(handlers::delete_handler),
            ),
        )
        .route(
            PRODUCTS_BY_CATEGORY,
            methods(get(handlers::category_handler)),
        )
        .route(HEALTH, methods(get(handlers::health_handler)))
        .route(OPENAPI, methods(get(handlers::openapi_handler)))
        .fallback(handlers::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{
        create_product, failing_app, memory_app, send, TestResponse,
    };
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_every_documented_route_dispatches() {
        let app = memory_app();
        create_product(&app, "7", "Shirt", "Clothing", "5.99").await;

        let cases = [
            ("GET", "/products", None, StatusCode::OK),
            (
                "POST",
                "/products",
                Some(json!({
                    "productId": "8",
                    "productName": "Hat",
                    "productCategory": "Clothing",
                    "productPrice": "9"
                })),
                StatusCode::CREATED,
            ),
            ("GET", "/products/7", None, StatusCode::OK),
            (
                "PATCH",
                "/products/7",
                Some(json!({"updateKey": "productName", "updateValue": "Polo"})),
                StatusCode::NO_CONTENT,
            ),
            ("GET", "/products/categories/Clothing", None, StatusCode::OK),
            ("DELETE", "/products/8", None, StatusCode::NO_CONTENT),
        ];

        for (method, uri, body, expected) in cases {
            let response = send(&app, method, uri, body).await;
            assert_eq!(response.status, expected, "{} {}", method, uri);
            response.assert_cors();
        }
    }

    const UNMATCHED: [(&str, &str); 15] = [
        ("PUT", "/products"),
        ("DELETE", "/products"),
        ("PATCH", "/products"),
        ("HEAD", "/products"),
        ("POST", "/products/7"),
        ("PUT", "/products/7"),
        ("HEAD", "/products/7"),
        ("POST", "/products/categories/Clothing"),
        ("DELETE", "/products/categories/Clothing"),
        ("HEAD", "/products/categories/Clothing"),
        ("HEAD", "/health"),
        ("GET", "/"),
        ("GET", "/product"),
        ("GET", "/products/7/reviews"),
        ("GET", "/categories/Clothing"),
    ];

    // axum strips response bodies for HEAD.
    fn assert_not_found_body(method: &str, response: &TestResponse) {
        if method == "HEAD" {
            assert!(response.body.is_empty());
        } else {
            assert_eq!(response.json(), json!({"message": "Resource not found."}));
        }
    }

    #[tokio::test]
    async fn test_unmatched_routes_are_not_found() {
        let app = memory_app();
        create_product(&app, "7", "Shirt", "Clothing", "5.99").await;

        for (method, uri) in UNMATCHED {
            let response = send(&app, method, uri, None).await;

            assert_eq!(response.status, StatusCode::NOT_FOUND, "{} {}", method, uri);
            response.assert_cors();
            assert!(response.location().is_none());
            assert_not_found_body(method, &response);
        }

        // Nothing was touched by the unmatched requests.
        let response = send(&app, "GET", "/products/7", None).await;
        assert_eq!(response.json()["data"]["productName"], "Shirt");
    }

    #[tokio::test]
    async fn test_unmatched_routes_never_call_the_store() {
        // Any store call would surface as a 500.
        let app = failing_app("store touched");

        for (method, uri) in UNMATCHED {
            let response = send(&app, method, uri, None).await;

            assert_eq!(response.status, StatusCode::NOT_FOUND, "{} {}", method, uri);
            response.assert_cors();
            assert_not_found_body(method, &response);
        }
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let app = memory_app();
        create_product(&app, "7", "Shirt", "Clothing", "5.99").await;

        let response = send(&app, "GET", "/products/7", None).await;
        assert_eq!(
            response.json(),
            json!({"data": {"productName": "Shirt", "productCategory": "Clothing", "productPrice": "5.99"}})
        );

        let response = send(&app, "GET", "/products", None).await;
        assert_eq!(
            response.json(),
            json!({"data": [{"productName": "Shirt", "productCategory": "Clothing", "productPrice": "5.99"}]})
        );

        let response = send(&app, "GET", "/products/categories/Clothing", None).await;
        assert_eq!(response.json()["data"][0]["productId"], "7");

        let response = send(&app, "DELETE", "/products/7", None).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);

        let response = send(&app, "GET", "/products", None).await;
        assert_eq!(response.json(), json!({"data": []}));
    }
}
