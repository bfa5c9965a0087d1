//! Persistence for saved analyses. Rows are append-only: one insert per
//! completed analysis, reads ordered newest-first, ownership-checked delete.

use anyhow::anyhow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{JobMatch, ResumeAnalysis, SavedAnalysisRow};

/// Inserts an analysis envelope for a user and touches the user's
/// `last_analysis_at` marker.
pub async fn save_analysis(
    pool: &PgPool,
    user_id: Uuid,
    analysis: &ResumeAnalysis,
    matches: &[JobMatch],
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    let matches_value = serde_json::to_value(matches)
        .map_err(|e| AppError::Internal(anyhow!("Failed to serialize matches: {e}")))?;
    let full_analysis = serde_json::to_value(analysis)
        .map_err(|e| AppError::Internal(anyhow!("Failed to serialize analysis: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO analyses
            (id, user_id, ats_score, detected_role, top_skills, summary, matches, full_analysis)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(analysis.ats_score)
    .bind(&analysis.detected_role)
    .bind(&analysis.top_skills)
    .bind(&analysis.summary)
    .bind(&matches_value)
    .bind(&full_analysis)
    .execute(pool)
    .await?;

    sqlx::query("UPDATE users SET last_analysis_at = now() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(id)
}

/// All analyses for a user, newest first, bounded by `limit`.
pub async fn list_user_analyses(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<SavedAnalysisRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM analyses WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_analysis(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<SavedAnalysisRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM analyses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Deletes an analysis after verifying ownership.
pub async fn delete_analysis(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Analysis {id} not found")));
    }
    Ok(())
}
