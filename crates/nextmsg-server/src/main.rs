use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod config;
mod models;
mod routes;
#[cfg(test)]
mod testing;

use adapters::GeminiGenerator;
use application::RewriteService;
use config::ServerConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub rewrite_service: Arc<RewriteService>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "NextMsg API is running - say it the way they want to hear it".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full application router: docs, health, rewrite endpoints, CORS
pub fn build_router(state: AppState) -> Router {
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::rewrite::router())
        .merge(routes::batch::router())
        .layer(routes::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("💬 NextMsg API initializing...");

    dotenvy::dotenv().ok();

    // Shuttle secrets win over the process environment
    let config = ServerConfig::from_lookup(|key| {
        secrets.get(key).or_else(|| std::env::var(key).ok())
    });
    tracing::debug!("Loaded config: {:?}", config);

    let generator = GeminiGenerator::from_config(&config)?;
    if generator.has_credential() {
        tracing::info!("🔑 Gemini client initialized ({})", config.gemini_model);
    } else {
        tracing::warn!("⚠️  No GEMINI_API_KEY set - rewrite requests will fail");
    }

    let state = AppState {
        rewrite_service: Arc::new(RewriteService::new(Arc::new(generator))),
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ NextMsg API ready");

    Ok(router.into())
}
