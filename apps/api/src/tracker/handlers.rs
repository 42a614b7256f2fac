use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, JobApplication, NewApplication, UnknownStatus};
use crate::state::AppState;
use crate::storage::{ApplicationStore, HistoryStore};

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Serialize)]
pub struct ClearedData {
    pub history_deleted: u64,
    pub applications_deleted: u64,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    Ok(Json(state.applications.list().await?))
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(body): Json<NewApplication>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    if body.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "company_name must not be empty".to_string(),
        ));
    }
    let created = state.applications.create(&body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<JobApplication>, AppError> {
    let status: ApplicationStatus = body
        .status
        .parse()
        .map_err(|e: UnknownStatus| AppError::Validation(e.to_string()))?;
    state
        .applications
        .update_status(id, status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.applications.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Application {id} not found")))
    }
}

/// DELETE /api/v1/data
///
/// Wipes saved resume history and every tracked application. Live sessions
/// are left alone.
pub async fn handle_clear_data(
    State(state): State<AppState>,
) -> Result<Json<ClearedData>, AppError> {
    let history_deleted = state.capabilities.history.clear().await?;
    let applications_deleted = state.applications.clear().await?;
    info!("Cleared {history_deleted} history entries and {applications_deleted} applications");
    Ok(Json(ClearedData {
        history_deleted,
        applications_deleted,
    }))
}
