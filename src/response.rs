//! Response envelopes shared by every route.
//!
//! Success bodies are `{"data": ...}`, error bodies are `{"message": ...}`,
//! and both carry the same fixed CORS headers.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS,POST,GET,PUT,DELETE"),
];

#[derive(Serialize)]
struct Data<T> {
    data: T,
}

#[derive(Serialize)]
struct Message {
    message: String,
}

/// Wrap `data` in the success envelope
pub fn success<T: Serialize>(status: StatusCode, data: T, location: Option<&str>) -> Response {
    match serde_json::to_vec(&Data { data }) {
        Ok(body) => build(status, Some(body), location),
        Err(err) => {
            tracing::error!("Failed to serialize response body: {}", err);
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Empty-bodied success, used by update and delete
pub fn no_content(location: &str) -> Response {
    build(StatusCode::NO_CONTENT, None, Some(location))
}

/// Wrap `message` in the error envelope
pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::to_vec(&Message { message: message.into() })
        .unwrap_or_else(|_| br#"{"message":"Internal server error"}"#.to_vec());
    build(status, Some(body), None)
}

/// Attach the CORS headers to a response built elsewhere
pub fn with_cors(response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

fn build(status: StatusCode, body: Option<Vec<u8>>, location: Option<&str>) -> Response {
    let mut response = match body {
        Some(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        None => Response::new(Body::empty()),
    };
    *response.status_mut() = status;

    if let Some(location) = location {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                response.headers_mut().insert(header::LOCATION, value);
            }
            Err(_) => tracing::warn!("Dropping Location header with invalid characters: {:?}", location),
        }
    }

    with_cors(response)
}

/// Location of a single product resource
pub fn product_location(product_id: &str) -> String {
    format!("/products/{}", product_id)
}
