use std::collections::HashSet;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::matching::match_jobs;
use crate::analysis::resume::analyze_resume;
use crate::analysis::skill_gap::skill_gap_analysis;
use crate::analysis::store;
use crate::auth::session::Session;
use crate::errors::AppError;
use crate::jobs::store::{list_active_jobs, list_job_ids};
use crate::models::analysis::{JobMatch, ResumeAnalysis, SavedAnalysisRow, SkillGap};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub resume: ResumeAnalysis,
    pub matches: Vec<JobMatch>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisDetail {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume: ResumeAnalysis,
    pub matches: Vec<JobMatch>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub target_role: String,
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub gaps: Vec<SkillGap>,
}

/// POST /api/v1/analyses
///
/// Multipart resume upload. The analysis call is fail-closed; the match
/// pass over the active catalog is fail-open, so a model hiccup there
/// still returns the score with fewer (or no) matches.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisResponse>), AppError> {
    let (mime_type, bytes) = read_resume_field(multipart).await?;
    let data_base64 = STANDARD.encode(&bytes);

    let analysis = analyze_resume(state.model.as_ref(), data_base64, mime_type).await?;

    // Catalog snapshot at call time; matches are validated against it.
    let catalog = list_active_jobs(&state.db).await?;
    let matches = match_jobs(state.model.as_ref(), &analysis, &catalog).await;

    let id = store::save_analysis(&state.db, session.user.id, &analysis, &matches).await?;
    info!(
        "Saved analysis {id} for user {} (score {}, {} matches)",
        session.user.id,
        analysis.ats_score,
        matches.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(AnalysisResponse {
            id,
            resume: analysis,
            matches,
        }),
    ))
}

/// GET /api/v1/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SavedAnalysisRow>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 100);
    let rows = store::list_user_analyses(&state.db, session.user.id, limit).await?;
    Ok(Json(rows))
}

/// GET /api/v1/analyses/:id
///
/// Matches whose job has since been deleted are filtered here, at render
/// time; they are orphans, not data-integrity violations.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisDetail>, AppError> {
    let row = fetch_owned_analysis(&state, &session, id).await?;

    let resume: ResumeAnalysis = serde_json::from_value(row.full_analysis)
        .map_err(|e| AppError::Internal(anyhow!("Stored analysis {id} is unreadable: {e}")))?;
    let matches: Vec<JobMatch> = serde_json::from_value(row.matches)
        .map_err(|e| AppError::Internal(anyhow!("Stored matches for {id} are unreadable: {e}")))?;

    let known_jobs: HashSet<Uuid> = list_job_ids(&state.db).await?.into_iter().collect();
    let matches: Vec<JobMatch> = matches
        .into_iter()
        .filter(|m| known_jobs.contains(&m.job_id))
        .collect();

    Ok(Json(AnalysisDetail {
        id: row.id,
        created_at: row.created_at,
        resume,
        matches,
    }))
}

/// DELETE /api/v1/analyses/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_analysis(&state.db, id, session.user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/analyses/:id/skill-gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<SkillGapRequest>,
) -> Result<Json<SkillGapResponse>, AppError> {
    if req.target_role.trim().is_empty() {
        return Err(AppError::Validation("target_role is required".to_string()));
    }

    let row = fetch_owned_analysis(&state, &session, id).await?;
    let resume: ResumeAnalysis = serde_json::from_value(row.full_analysis)
        .map_err(|e| AppError::Internal(anyhow!("Stored analysis {id} is unreadable: {e}")))?;

    let gaps = skill_gap_analysis(state.model.as_ref(), &resume, req.target_role.trim()).await;
    Ok(Json(SkillGapResponse { gaps }))
}

/// Loads an analysis, treating rows owned by other users as not found.
async fn fetch_owned_analysis(
    state: &AppState,
    session: &Session,
    id: Uuid,
) -> Result<SavedAnalysisRow, AppError> {
    let row = store::get_analysis(&state.db, id)
        .await?
        .filter(|row| row.user_id == session.user.id)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(row)
}

/// Pulls the uploaded resume out of the multipart body: the field named
/// `resume`, or failing that the first field carrying a file name.
async fn read_resume_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let is_resume = field.name() == Some("resume") || field.file_name().is_some();
        if !is_resume {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/pdf")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded resume is empty".to_string()));
        }
        return Ok((mime_type, bytes.to_vec()));
    }

    Err(AppError::Validation(
        "Multipart body must contain a 'resume' file field".to_string(),
    ))
}
