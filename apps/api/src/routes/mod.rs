pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::orchestrator::handlers;
use crate::tracker::handlers as tracker;
use crate::state::AppState;

/// Uploads (resume PDFs, job description screenshots) are capped at 10 MiB.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/styles", get(handlers::handle_list_styles))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/source",
            post(handlers::handle_upload_source),
        )
        .route(
            "/api/v1/sessions/:id/resume-text",
            put(handlers::handle_set_resume_text),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            put(handlers::handle_set_job_description),
        )
        .route(
            "/api/v1/sessions/:id/job-description/image",
            post(handlers::handle_job_description_image),
        )
        .route("/api/v1/sessions/:id/tailor", post(handlers::handle_tailor))
        .route(
            "/api/v1/sessions/:id/style",
            put(handlers::handle_change_style),
        )
        .route(
            "/api/v1/sessions/:id/fields",
            patch(handlers::handle_edit_fields),
        )
        .route(
            "/api/v1/sessions/:id/document",
            get(handlers::handle_get_document),
        )
        .route(
            "/api/v1/sessions/:id/document/export",
            post(handlers::handle_export_document),
        )
        .route(
            "/api/v1/sessions/:id/error/dismiss",
            post(handlers::handle_dismiss_error),
        )
        .route(
            "/api/v1/sessions/:id/history/:entry_id",
            post(handlers::handle_load_history),
        )
        // History
        .route(
            "/api/v1/history",
            get(handlers::handle_list_history).delete(handlers::handle_clear_history),
        )
        .route(
            "/api/v1/history/:entry_id",
            delete(handlers::handle_delete_history),
        )
        // Application tracker
        .route(
            "/api/v1/applications",
            get(tracker::handle_list_applications).post(tracker::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            delete(tracker::handle_delete_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(tracker::handle_update_status),
        )
        .route("/api/v1/data", delete(tracker::handle_clear_data))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
