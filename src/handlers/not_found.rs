use crate::error::ApiError;
use axum::http::{Method, Uri};

/// Fallback for every (path, method) pair without a route
///
/// Never touches the store.
pub async fn not_found_handler(method: Method, uri: Uri) -> ApiError {
    tracing::debug!("No route for {} {}", method, uri.path());
    ApiError::RouteNotFound
}
