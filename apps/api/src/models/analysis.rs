use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Status attached to each feedback section of a resume analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackStatus {
    Strong,
    Improve,
    Critical,
}

/// Categorical fit of a resume against one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitLabel {
    High,
    Medium,
    Low,
}

/// Importance of a missing skill in a skill-gap report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Structured output of the resume analysis call. Immutable once produced.
///
/// Field names mirror the model's response schema (camelCase on the wire).
/// Array fields default to empty when the model omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub ats_score: i32,
    pub summary: String,
    pub detected_role: String,
    #[serde(default)]
    pub top_skills: Vec<String>,
    pub experience_level: String,

    pub skills_feedback: String,
    pub skills_status: FeedbackStatus,

    pub experience_feedback: String,
    pub experience_status: FeedbackStatus,

    pub keywords_feedback: String,
    pub keywords_status: FeedbackStatus,

    pub formatting_feedback: String,
    pub formatting_status: FeedbackStatus,

    #[serde(default)]
    pub improvement_tips: Vec<String>,
}

/// One resume-to-job comparison, produced only by the match orchestrator
/// and never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_id: Uuid,
    pub fit_score: i32,
    pub fit_label: FitLabel,
    pub reasoning: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

/// One identified gap for a (analysis, target role) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub importance: Importance,
    pub recommendation: String,
}

/// Persisted envelope binding a user to an analysis and its matches.
/// Rows are append-only; the only mutation is an ownership-checked delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedAnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ats_score: i32,
    pub detected_role: String,
    pub top_skills: Vec<String>,
    pub summary: String,
    pub matches: Value,
    pub full_analysis: Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_match_missing_skills_defaults_to_empty() {
        let json = serde_json::json!({
            "jobId": Uuid::new_v4(),
            "fitScore": 82,
            "fitLabel": "High",
            "reasoning": "Strong overlap on core stack."
        });
        let m: JobMatch = serde_json::from_value(json).unwrap();
        assert!(m.missing_skills.is_empty());
        assert_eq!(m.fit_label, FitLabel::High);
    }

    #[test]
    fn test_resume_analysis_array_fields_default_to_empty() {
        let json = serde_json::json!({
            "atsScore": 70,
            "summary": "Backend engineer with platform experience.",
            "detectedRole": "Backend Engineer",
            "experienceLevel": "Mid",
            "skillsFeedback": "Solid core skills.",
            "skillsStatus": "Strong",
            "experienceFeedback": "Impact could be quantified.",
            "experienceStatus": "Improve",
            "keywordsFeedback": "Missing several industry keywords.",
            "keywordsStatus": "Improve",
            "formattingFeedback": "Clean single-column layout.",
            "formattingStatus": "Strong"
        });
        let analysis: ResumeAnalysis = serde_json::from_value(json).unwrap();
        assert!(analysis.top_skills.is_empty());
        assert!(analysis.improvement_tips.is_empty());
        assert_eq!(analysis.skills_status, FeedbackStatus::Strong);
    }

    #[test]
    fn test_invalid_fit_label_rejected() {
        let result: Result<FitLabel, _> = serde_json::from_str("\"Excellent\"");
        assert!(result.is_err());
    }
}
