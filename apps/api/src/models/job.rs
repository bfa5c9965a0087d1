use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment type of a job posting. Stored as text; the API accepts and
/// emits the human-readable labels the catalog has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    Contract,
    Remote,
    Hybrid,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Remote => "Remote",
            EmploymentType::Hybrid => "Hybrid",
        }
    }
}

/// A job posting in the catalog. Mutated only through admin endpoints or
/// the bulk reset-to-defaults operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary_range: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
