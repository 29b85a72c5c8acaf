use crate::error::{ApiError, ErrorResponse};
use crate::models::GetResponse;
use crate::response;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
};

/// GET /products/{productId} handler - Retrieve one product
#[utoipa::path(
    get,
    path = routes::PRODUCT,
    params(
        ("productId" = String, Path, description = "Integer identifier of the product")
    ),
    responses(
        (status = 200, description = "Product found", body = GetResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(product_id) = path?;

    match state.store.get(&product_id).await? {
        Some(product) => {
            tracing::info!("Successfully retrieved product with id: {}", product_id);
            Ok(response::success(StatusCode::OK, product, None))
        }
        None => {
            tracing::info!("Product not found with id: {}", product_id);
            Err(ApiError::ProductNotFound(product_id))
        }
    }
}
