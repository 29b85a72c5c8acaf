use crate::api_doc::ApiDoc;
use crate::response;
use axum::{response::Response, Json};
use utoipa::OpenApi;

/// GET /api-docs/openapi.json handler - OpenAPI document for this service
pub async fn openapi_handler() -> Response {
    response::with_cors(Json(ApiDoc::openapi()))
}
