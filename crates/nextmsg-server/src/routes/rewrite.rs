//! Rewrite Routes - One relationship per request

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use super::{bad_request, error_response, method_not_allowed, preflight, ApiError};
use crate::models::{ErrorResponse, RewriteBody, VariantResponse};
use crate::AppState;

/// Rewrite a draft into three tonal variants
#[utoipa::path(
    post,
    path = "/api/rewrite",
    request_body = RewriteBody,
    responses(
        (status = 200, description = "Three variants, in model order", body = Vec<VariantResponse>),
        (status = 400, description = "Missing or unknown fields", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    ),
    tag = "Rewrite"
)]
pub async fn rewrite(
    State(state): State<AppState>,
    payload: Result<Json<RewriteBody>, JsonRejection>,
) -> Result<Json<Vec<VariantResponse>>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        tracing::warn!("Unreadable rewrite body: {}", e.body_text());
        bad_request(format!("Invalid request body: {}", e.body_text()))
    })?;

    let results = state
        .rewrite_service
        .rewrite(
            body.mode.as_deref(),
            body.draft.as_deref(),
            body.relationship.as_deref(),
            body.received_message.as_deref(),
        )
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(results.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/rewrite",
        post(rewrite).options(preflight).fallback(method_not_allowed),
    )
}
