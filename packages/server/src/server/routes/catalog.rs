//! Public read surface: browse and search the directory.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::domains::category::models::Category;
use crate::domains::service::models::Service;
use crate::server::app::AppState;
use crate::server::routes::discovery::ErrorResponse;

/// All active directory entries, newest first
pub async fn list_services_handler(Extension(state): Extension<AppState>) -> Response {
    match Service::find_active(&state.db_pool).await {
        Ok(services) => (StatusCode::OK, Json(services)).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// Text search over name, tagline and description
pub async fn search_services_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    match Service::search(params.q.trim(), &state.db_pool).await {
        Ok(services) => (StatusCode::OK, Json(services)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// The category vocabulary
pub async fn list_categories_handler(Extension(state): Extension<AppState>) -> Response {
    match Category::find_all(&state.db_pool).await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: anyhow::Error) -> Response {
    tracing::error!(error = %e, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            success: false,
            error: e.to_string(),
        }),
    )
        .into_response()
}
