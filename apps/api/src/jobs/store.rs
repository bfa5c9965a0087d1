//! Job catalog persistence: CRUD plus the atomic reset-to-defaults.

use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::seed::default_jobs;
use crate::models::job::{EmploymentType, JobRow};

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: EmploymentType,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary_range: Option<String>,
}

/// Partial update for a job posting. Absent fields keep their value.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<EmploymentType>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub salary_range: Option<String>,
    pub is_active: Option<bool>,
}

/// The full catalog, newest posting first.
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    let rows = sqlx::query_as("SELECT * FROM jobs ORDER BY created_at DESC, id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Active postings only — the catalog snapshot handed to the matcher.
pub async fn list_active_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    let rows =
        sqlx::query_as("SELECT * FROM jobs WHERE is_active ORDER BY created_at DESC, id")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Current catalog job ids, for orphaned-match filtering on reads.
pub async fn list_job_ids(pool: &PgPool) -> Result<Vec<Uuid>, AppError> {
    let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM jobs")
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().map(|(id,)| id).collect())
}

pub async fn create_job(pool: &PgPool, new: &NewJob) -> Result<JobRow, AppError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO jobs (id, title, company, location, job_type, description, requirements, salary_range)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.title)
    .bind(&new.company)
    .bind(&new.location)
    .bind(new.job_type.as_str())
    .bind(&new.description)
    .bind(&new.requirements)
    .bind(&new.salary_range)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_job(pool: &PgPool, id: Uuid, patch: &JobPatch) -> Result<JobRow, AppError> {
    let row: Option<JobRow> = sqlx::query_as(
        r#"
        UPDATE jobs SET
            title        = COALESCE($2, title),
            company      = COALESCE($3, company),
            location     = COALESCE($4, location),
            job_type     = COALESCE($5, job_type),
            description  = COALESCE($6, description),
            requirements = COALESCE($7, requirements),
            salary_range = COALESCE($8, salary_range),
            is_active    = COALESCE($9, is_active)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.company)
    .bind(&patch.location)
    .bind(patch.job_type.map(|t| t.as_str()))
    .bind(&patch.description)
    .bind(&patch.requirements)
    .bind(&patch.salary_range)
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(())
}

/// Replaces the whole catalog with the default seed set, delete-then-reseed
/// inside one transaction so there is no observable empty-catalog window.
pub async fn reset_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM jobs").execute(&mut *tx).await?;
    insert_seed_jobs(&mut tx).await?;
    tx.commit().await?;

    info!("Job catalog reset to defaults");
    list_jobs(pool).await
}

/// Seeds an empty catalog at startup.
pub async fn ensure_seeded(pool: &PgPool) -> Result<(), AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await?;
    if count == 0 {
        let mut tx = pool.begin().await?;
        insert_seed_jobs(&mut tx).await?;
        tx.commit().await?;
        info!("Seeded empty job catalog with defaults");
    }
    Ok(())
}

/// Seed rows get staggered creation times so the default display order
/// survives the newest-first listing.
async fn insert_seed_jobs(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
    let now = Utc::now();
    for (i, job) in default_jobs().into_iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, company, location, job_type, description, requirements, salary_range, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.job_type.as_str())
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.salary_range)
        .bind(now - Duration::seconds(i as i64))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
