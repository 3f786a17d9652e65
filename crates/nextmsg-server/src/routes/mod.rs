//! NextMsg API Routes
//!
//! - /api/rewrite - Rewrite a draft for one relationship
//! - /api/rewrite/batch - Rewrite for several relationships at once
//!
//! Both accept POST and OPTIONS; anything else is a 405.

pub mod batch;
pub mod rewrite;
pub mod swagger;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    Json,
};
use tower_http::cors::{Any, CorsLayer};

use crate::models::ErrorResponse;
use nextmsg::RewriteError;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Cross-origin access from anywhere, fixed method and header lists
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ])
}

/// Map a rewrite error to its HTTP status and body
pub fn error_response(err: &RewriteError) -> ApiError {
    let status = if err.is_client_fault() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Plain OPTIONS (no CORS preflight headers)
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}
