use crate::error::ErrorResponse;
use crate::models::{HealthResponse, HealthStatus};
use crate::response;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Response};

/// GET /health handler - Health check endpoint
///
/// Asks the store to prove it is reachable. Returns 200 OK if it is,
/// 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = ErrorResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> Response {
    match state.store.health_check().await {
        Ok(()) => {
            tracing::debug!("Health check passed");
            response::success(
                StatusCode::OK,
                HealthStatus {
                    status: "healthy".to_string(),
                    table: state.config.products_table.clone(),
                },
                None,
            )
        }
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            response::error(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Cannot connect to store: {:#}", e),
            )
        }
    }
}
