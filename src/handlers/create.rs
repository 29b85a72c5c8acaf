use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateResponse, CreatedProduct, NewProduct, Product};
use crate::response;
use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};

/// POST /products handler - Store a product under its caller-chosen id
///
/// An existing product with the same id is overwritten. The payload is handed
/// to the store unvalidated, so malformed input comes back as a store error.
#[utoipa::path(
    post,
    path = routes::PRODUCTS,
    request_body = Product,
    responses(
        (status = 201, description = "Product stored", body = CreateResponse,
            headers(("Location" = String, description = "Path of the stored product"))),
        (status = 500, description = "Store error, including a malformed body or a non-numeric id or price", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload: NewProduct =
        serde_json::from_slice(&body).context("Failed to parse product payload")?;

    let product: Product = state.store.put(&payload).await?;

    tracing::info!("Successfully stored product with id: {}", product.product_id);
    let location = response::product_location(&product.product_id);
    Ok(response::success(
        StatusCode::CREATED,
        CreatedProduct {
            product_id: product.product_id,
        },
        Some(&location),
    ))
}
