//! Discovery endpoints: the job trigger plus the admin review surface.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::DiscoveryId;
use crate::domains::discovery::activities::run_discovery;
use crate::domains::discovery::models::{DiscoveredService, DiscoveryRun, DiscoveryStatus};
use crate::domains::service::models::Service;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct DiscoveryRunResponse {
    pub success: bool,
    pub discovered: usize,
    pub queries_processed: usize,
    pub total_discoveries: usize,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Trigger one discovery run. No request body; the response summary is
/// consumed by the admin dashboard.
pub async fn trigger_discovery_handler(Extension(state): Extension<AppState>) -> Response {
    match run_discovery("manual", &state.server_deps).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(DiscoveryRunResponse {
                success: true,
                discovered: summary.discovered,
                queries_processed: summary.queries_processed,
                total_discoveries: summary.total_discoveries,
                message: format!("Discovered {} new AI tools", summary.discovered),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Discovery run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    success: false,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Recent run lineage for the admin dashboard
pub async fn list_runs_handler(Extension(state): Extension<AppState>) -> Response {
    match DiscoveryRun::find_recent(20, &state.db_pool).await {
        Ok(runs) => (StatusCode::OK, Json(runs)).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub struct DiscoveryFilter {
    pub status: Option<String>,
}

/// Staged discoveries, optionally filtered by review status
pub async fn list_discoveries_handler(
    Extension(state): Extension<AppState>,
    Query(filter): Query<DiscoveryFilter>,
) -> Response {
    let result = match filter.status.as_deref() {
        Some(raw) => match raw.parse::<DiscoveryStatus>() {
            Ok(status) => DiscoveredService::find_by_status(status, &state.db_pool).await,
            Err(e) => return bad_request(e),
        },
        None => DiscoveredService::find_recent(100, &state.db_pool).await,
    };

    match result {
        Ok(discoveries) => (StatusCode::OK, Json(discoveries)).into_response(),
        Err(e) => internal_error(e),
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Move a discovery along the review workflow.
///
/// Transitions are forward-only; approving a discovery also copies it into
/// the directory.
pub async fn update_discovery_status_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<DiscoveryId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Response {
    let next = match body.status.parse::<DiscoveryStatus>() {
        Ok(status) => status,
        Err(e) => return bad_request(e),
    };

    let updated = match DiscoveredService::set_status(id, next, &state.db_pool).await {
        Ok(updated) => updated,
        Err(e) => return bad_request(e),
    };

    if next == DiscoveryStatus::Approved {
        match Service::create_from_discovery(&updated, &state.db_pool).await {
            Ok(Some(service)) => {
                tracing::info!(
                    discovery_id = %updated.id,
                    service_id = %service.id,
                    "Approved discovery published to directory"
                );
            }
            Ok(None) => {
                tracing::warn!(
                    discovery_id = %updated.id,
                    website_url = %updated.website_url,
                    "Approved discovery already present in directory"
                );
            }
            Err(e) => return internal_error(e),
        }
    }

    (StatusCode::OK, Json(updated)).into_response()
}

fn bad_request(e: anyhow::Error) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: e.to_string(),
        }),
    )
        .into_response()
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
