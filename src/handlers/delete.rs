use crate::error::{ApiError, ErrorResponse};
use crate::response;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Response,
};

/// DELETE /products/{productId} handler - Remove a product
///
/// Deleting an id that does not exist still succeeds.
#[utoipa::path(
    delete,
    path = routes::PRODUCT,
    params(
        ("productId" = String, Path, description = "Integer identifier of the product")
    ),
    responses(
        (status = 204, description = "Product removed or already absent",
            headers(("Location" = String, description = "Path of the removed product"))),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(product_id) = path?;

    state.store.delete(&product_id).await?;

    tracing::info!("Successfully deleted product with id: {}", product_id);
    Ok(response::no_content(&response::product_location(&product_id)))
}
