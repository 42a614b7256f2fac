use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::history::HistoryEntry;
use crate::models::resume::FieldPatch;
use crate::orchestrator::{AiOutcome, GenerationOrchestrator, OrchestratorError, SessionSnapshot};
use crate::render::StyleId;
use crate::source::SourceDocument;
use crate::state::AppState;
use crate::storage::archive::export_key;
use crate::storage::{DocumentArchive, HistoryStore};
use crate::tailoring::ImageDocument;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub snapshot: SessionSnapshot,
}

#[derive(Serialize)]
pub struct ActionResponse {
    pub outcome: AiOutcome,
    pub snapshot: SessionSnapshot,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub key: String,
}

#[derive(Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Deserialize)]
pub struct StyleBody {
    pub style: String,
}

/// An uploaded multipart `file` field.
struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

async fn session(state: &AppState, id: Uuid) -> Result<GenerationOrchestrator, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        return Ok(Upload {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation("Missing 'file' field".to_string()))
}

/// GET /api/v1/styles
pub async fn handle_list_styles() -> Json<Vec<StyleId>> {
    Json(StyleId::ALL.to_vec())
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let (session_id, orchestrator) = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            snapshot: orchestrator.snapshot(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(session(&state, id).await?.snapshot()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/source
pub async fn handle_upload_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    let upload = read_file_field(multipart).await?;
    orchestrator
        .load_source(SourceDocument {
            file_name: upload.file_name,
            content_type: upload.content_type,
            bytes: upload.bytes,
        })
        .await;
    Ok(Json(orchestrator.snapshot()))
}

/// PUT /api/v1/sessions/:id/resume-text
pub async fn handle_set_resume_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TextBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    orchestrator.set_resume_text(body.text);
    Ok(Json(orchestrator.snapshot()))
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TextBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    orchestrator.set_job_description(body.text);
    Ok(Json(orchestrator.snapshot()))
}

/// POST /api/v1/sessions/:id/job-description/image
pub async fn handle_job_description_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, AppError> {
    let orchestrator = session(&state, id).await?;
    let upload = read_file_field(multipart).await?;
    let media_type = upload
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .ok_or_else(|| AppError::Validation("Upload must be an image".to_string()))?;

    let outcome = orchestrator
        .extract_job_description_from_image(ImageDocument {
            media_type,
            bytes: upload.bytes,
        })
        .await;
    Ok(Json(ActionResponse {
        outcome,
        snapshot: orchestrator.snapshot(),
    }))
}

/// POST /api/v1/sessions/:id/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    let orchestrator = session(&state, id).await?;
    let outcome = orchestrator.tailor().await;
    Ok(Json(ActionResponse {
        outcome,
        snapshot: orchestrator.snapshot(),
    }))
}

/// PUT /api/v1/sessions/:id/style
pub async fn handle_change_style(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StyleBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    let style: StyleId = body
        .style
        .parse()
        .map_err(|e: crate::render::UnknownStyle| AppError::Validation(e.to_string()))?;
    orchestrator.change_style(style);
    Ok(Json(orchestrator.snapshot()))
}

/// PATCH /api/v1/sessions/:id/fields
pub async fn handle_edit_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FieldPatch>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    orchestrator.edit_fields(patch)?;
    Ok(Json(orchestrator.snapshot()))
}

/// GET /api/v1/sessions/:id/document
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let html = session(&state, id)
        .await?
        .rendered_document()
        .ok_or(OrchestratorError::NoDocument)?;
    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response())
}

/// POST /api/v1/sessions/:id/document/export
pub async fn handle_export_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let html = session(&state, id)
        .await?
        .rendered_document()
        .ok_or(OrchestratorError::NoDocument)?;
    let key = export_key(id, Uuid::new_v4());
    state.archive.store(&key, html).await?;
    Ok(Json(ExportResponse { key }))
}

/// POST /api/v1/sessions/:id/error/dismiss
pub async fn handle_dismiss_error(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    orchestrator.dismiss_error();
    Ok(Json(orchestrator.snapshot()))
}

/// POST /api/v1/sessions/:id/history/:entry_id
pub async fn handle_load_history(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let orchestrator = session(&state, id).await?;
    orchestrator.load_history(entry_id).await?;
    Ok(Json(orchestrator.snapshot()))
}

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.capabilities.history.list().await?))
}

#[derive(Serialize)]
pub struct ClearedHistory {
    pub deleted: u64,
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(
    State(state): State<AppState>,
) -> Result<Json<ClearedHistory>, AppError> {
    let deleted = state.capabilities.history.clear().await?;
    Ok(Json(ClearedHistory { deleted }))
}

/// DELETE /api/v1/history/:entry_id
pub async fn handle_delete_history(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.capabilities.history.delete(entry_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(OrchestratorError::HistoryNotFound(entry_id).into())
    }
}
