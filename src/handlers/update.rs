use crate::error::{ApiError, ErrorResponse};
use crate::models::{ProductField, UpdateRequest};
use crate::response;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    Json,
};

/// PATCH /products/{productId} handler - Change one attribute of a product
///
/// `updateKey` must name a mutable attribute (`productName`, `productCategory`
/// or `productPrice`); anything else is rejected before the store is called.
#[utoipa::path(
    patch,
    path = routes::PRODUCT,
    params(
        ("productId" = String, Path, description = "Integer identifier of the product")
    ),
    request_body = UpdateRequest,
    responses(
        (status = 204, description = "Attribute updated",
            headers(("Location" = String, description = "Path of the updated product"))),
        (status = 400, description = "Unknown updateKey or malformed body", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(product_id) = path?;
    let Json(request) = payload?;

    let field: ProductField = request
        .update_key
        .parse()
        .map_err(ApiError::InvalidUpdateKey)?;
    let value = request.update_value.into_text();

    if !state.store.update(&product_id, field, &value).await? {
        tracing::info!("Product not found for update with id: {}", product_id);
        return Err(ApiError::ProductNotFound(product_id));
    }

    tracing::info!("Successfully updated {} of product with id: {}", field, product_id);
    Ok(response::no_content(&response::product_location(&product_id)))
}
