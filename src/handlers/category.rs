use crate::error::{ApiError, ErrorResponse};
use crate::models::CategoryResponse;
use crate::response;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
};

/// GET /products/categories/{categoryName} handler - Products in one category
///
/// Answered from the category index rather than a filtered scan.
#[utoipa::path(
    get,
    path = routes::PRODUCTS_BY_CATEGORY,
    params(
        ("categoryName" = String, Path, description = "Exact category to match")
    ),
    responses(
        (status = 200, description = "Products in the category, possibly none", body = CategoryResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn category_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(category) = path?;

    let products = state.store.query_by_category(&category).await?;

    tracing::info!("Found {} products in category: {}", products.len(), category);
    Ok(response::success(StatusCode::OK, products, None))
}
