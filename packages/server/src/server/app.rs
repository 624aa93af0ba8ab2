//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::{
    HttpFileStorage, OpenAiImageGenerator, OpenAiOracle, ScreenshotClient, ServerDeps,
};
use crate::server::routes::{
    health_handler, list_categories_handler, list_discoveries_handler, list_runs_handler,
    list_services_handler, search_services_handler, trigger_discovery_handler,
    update_discovery_status_handler,
};
use crate::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
}

/// Wire up production service clients from configuration.
pub fn build_deps(pool: PgPool, config: &Config) -> anyhow::Result<ServerDeps> {
    let oracle = Arc::new(OpenAiOracle::new(config.openai_api_key.clone())?);
    let screenshots = Arc::new(ScreenshotClient::new(
        config.screenshot_endpoint.clone(),
        config.screenshot_access_key.clone(),
    )?);
    let image_gen = Arc::new(OpenAiImageGenerator::new(config.openai_api_key.clone())?);
    let file_storage = Arc::new(HttpFileStorage::new(
        config.upload_endpoint.clone(),
        config.upload_api_token.clone(),
    )?);

    Ok(ServerDeps::new(
        pool,
        oracle,
        screenshots,
        image_gen,
        file_storage,
    ))
}

/// Build the Axum application router
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(health_handler))
        // Discovery job trigger + admin review surface
        .route("/api/discovery/run", post(trigger_discovery_handler))
        .route("/api/discovery/runs", get(list_runs_handler))
        .route("/api/discoveries", get(list_discoveries_handler))
        .route(
            "/api/discoveries/:id/status",
            post(update_discovery_status_handler),
        )
        // Public directory read surface
        .route("/api/services", get(list_services_handler))
        .route("/api/services/search", get(search_services_handler))
        .route("/api/categories", get(list_categories_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
