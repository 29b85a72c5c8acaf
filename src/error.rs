use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::models::ProductField;
use crate::response;

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Resource not found.";

/// Error envelope returned by every failing route
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Custom error type for API endpoints
///
/// Every variant is rendered through [`response::error`], so failures carry
/// the same `{"message": ...}` envelope and CORS headers as successes.
#[derive(Debug)]
pub enum ApiError {
    /// No route matches the request's path and method
    RouteNotFound,
    /// Point lookup or update targeted an absent product
    ProductNotFound(String),
    /// `updateKey` names an attribute that may not be changed
    InvalidUpdateKey(String),
    /// Request body or path could not be extracted
    InvalidRequest(String),
    /// Store operation error
    Store(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_MESSAGE.to_string()),
            ApiError::ProductNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Product not found: {}", id),
            ),
            ApiError::InvalidUpdateKey(key) => {
                let allowed: Vec<&str> = ProductField::ALL.iter().map(|f| f.attribute()).collect();
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid updateKey '{}': must be one of {}", key, allowed.join(", ")),
                )
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store(err) => {
                tracing::error!("Store operation failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
            }
        };

        response::error(status, message)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}
