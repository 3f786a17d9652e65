//! Batch Rewrite Routes - Fan-out across relationships

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use super::{bad_request, error_response, method_not_allowed, preflight, ApiError};
use crate::application::MISSING_BATCH_FIELDS_MESSAGE;
use crate::models::{BatchRewriteBody, BatchRewriteResponse, ErrorResponse};
use crate::AppState;

/// Rewrite a draft for several relationships concurrently
///
/// All-or-nothing: one failed relationship fails the whole batch and no
/// partial results are returned.
#[utoipa::path(
    post,
    path = "/api/rewrite/batch",
    request_body = BatchRewriteBody,
    responses(
        (status = 200, description = "Variants keyed by relationship label", body = BatchRewriteResponse),
        (status = 400, description = "Missing or unknown fields", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "A relationship failed to generate", body = ErrorResponse)
    ),
    tag = "Rewrite"
)]
pub async fn rewrite_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRewriteBody>, JsonRejection>,
) -> Result<Json<BatchRewriteResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        tracing::warn!("Unreadable batch body: {}", e.body_text());
        bad_request(format!("Invalid request body: {}", e.body_text()))
    })?;

    let request = state
        .rewrite_service
        .batch_request(
            body.mode.as_deref(),
            body.draft.as_deref(),
            body.received_message.as_deref(),
            body.relationships.as_deref(),
        )
        .map_err(|e| error_response(&e))?;

    let aggregate = state
        .rewrite_service
        .rewrite_batch(&request)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
        })?
        .ok_or_else(|| bad_request(MISSING_BATCH_FIELDS_MESSAGE))?;

    Ok(Json(aggregate.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/rewrite/batch",
        post(rewrite_batch)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}
