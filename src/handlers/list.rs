use crate::error::{ApiError, ErrorResponse};
use crate::models::ListResponse;
use crate::response;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};

/// GET /products handler - List every product
///
/// Scans the whole table and projects name, category and price. The
/// identifier is not part of the projection.
#[utoipa::path(
    get,
    path = routes::PRODUCTS,
    responses(
        (status = 200, description = "All products, possibly none", body = ListResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let products = state.store.scan().await?;

    tracing::info!("Listed {} products", products.len());
    Ok(response::success(StatusCode::OK, products, None))
}
