use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::session::Session;
use crate::errors::AppError;
use crate::jobs::store::{self, JobPatch, NewJob};
use crate::models::job::JobRow;
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _session: Session,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(store::list_jobs(&state.db).await?))
}

/// POST /api/v1/jobs (admin)
pub async fn handle_create_job(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    session.require_admin()?;
    if req.title.trim().is_empty() || req.company.trim().is_empty() {
        return Err(AppError::Validation(
            "Job title and company are required".to_string(),
        ));
    }
    let job = store::create_job(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /api/v1/jobs/:id (admin)
pub async fn handle_update_job(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<JobRow>, AppError> {
    session.require_admin()?;
    Ok(Json(store::update_job(&state.db, id, &patch).await?))
}

/// DELETE /api/v1/jobs/:id (admin)
pub async fn handle_delete_job(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session.require_admin()?;
    store::delete_job(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/reset (admin)
/// Atomically replaces the catalog with the default seed set.
pub async fn handle_reset_jobs(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<JobRow>>, AppError> {
    session.require_admin()?;
    Ok(Json(store::reset_jobs(&state.db).await?))
}
