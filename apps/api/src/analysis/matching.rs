//! Batched Match Orchestrator — compares one resume analysis against the
//! job catalog, in fixed-size batches of one model call each.
//!
//! The structured-output mode of the model has a practical output-size
//! ceiling: asking for the whole catalog in one call risks truncated JSON.
//! Batching trades call count for reliability, and per-batch isolation
//! bounds the blast radius of one malformed response to that batch's jobs.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::llm_client::prompts::MATCHING_SYSTEM;
use crate::llm_client::{parse_structured, Part, TextModel};
use crate::models::analysis::{JobMatch, ResumeAnalysis};
use crate::models::job::JobRow;

/// Jobs per model call. Empirically 2 keeps per-call output small enough
/// to avoid truncated structured output.
pub const MATCH_BATCH_SIZE: usize = 2;

/// Job descriptions are truncated to this many characters in the prompt
/// to save input tokens; the full requirements list is always included.
const DESCRIPTION_SNIPPET_CHARS: usize = 150;

/// Upper bound on a single batch call. A hung call counts as a failed
/// batch instead of stalling the whole sequence.
const BATCH_CALL_TIMEOUT: Duration = Duration::from_secs(45);

const MATCH_PROMPT_TEMPLATE: &str = r#"RESUME SUMMARY: {summary}
RESUME SKILLS: {skills}
RESUME ROLE: {role}

AVAILABLE JOBS BATCH: {jobs_json}

Compare the resume to these jobs. Keep reasoning concise (max 20 words)."#;

#[derive(Debug, Deserialize)]
struct MatchEnvelope {
    #[serde(default)]
    matches: Vec<JobMatch>,
}

/// Produces a match list covering as many catalog jobs as possible.
///
/// Batches are issued sequentially; a batch whose call fails, times out,
/// or returns unparseable JSON contributes nothing, and the rest still
/// count. Matches echoing a job id outside the snapshot are dropped, so
/// the returned ids are always a subset of the input ids. Returns an
/// empty list (never an error) when every batch fails.
pub async fn match_jobs(
    model: &dyn TextModel,
    analysis: &ResumeAnalysis,
    jobs: &[JobRow],
) -> Vec<JobMatch> {
    let snapshot_ids: HashSet<Uuid> = jobs.iter().map(|j| j.id).collect();
    let skills = analysis.top_skills.join(", ");
    let schema = match_response_schema();

    let mut all_matches = Vec::new();

    for (batch_index, batch) in jobs.chunks(MATCH_BATCH_SIZE).enumerate() {
        let prompt = build_match_prompt(analysis, &skills, batch);
        let parts = [Part::Text(prompt)];

        let call = model.generate_structured(&parts, MATCHING_SYSTEM, &schema);
        let text = match tokio::time::timeout(BATCH_CALL_TIMEOUT, call).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Match batch {batch_index} call failed, skipping: {e}");
                continue;
            }
            Err(_) => {
                warn!(
                    "Match batch {batch_index} timed out after {}s, skipping",
                    BATCH_CALL_TIMEOUT.as_secs()
                );
                continue;
            }
        };

        match parse_structured::<MatchEnvelope>(&text) {
            Ok(envelope) => {
                for m in envelope.matches {
                    if snapshot_ids.contains(&m.job_id) {
                        all_matches.push(m);
                    } else {
                        warn!(
                            "Match batch {batch_index} returned unknown job id {}, dropping",
                            m.job_id
                        );
                    }
                }
            }
            Err(e) => {
                let preview: String = text.chars().take(200).collect();
                warn!("Match batch {batch_index} parse failed, skipping: {e}; raw: {preview}");
            }
        }
    }

    all_matches
}

fn build_match_prompt(analysis: &ResumeAnalysis, skills: &str, batch: &[JobRow]) -> String {
    // Lightweight job context: truncated description, full requirements.
    let job_context: Vec<Value> = batch
        .iter()
        .map(|j| {
            json!({
                "id": j.id,
                "title": j.title,
                "description": snippet(&j.description, DESCRIPTION_SNIPPET_CHARS),
                "requirements": j.requirements,
            })
        })
        .collect();

    MATCH_PROMPT_TEMPLATE
        .replace("{summary}", &analysis.summary)
        .replace("{skills}", skills)
        .replace("{role}", &analysis.detected_role)
        .replace("{jobs_json}", &Value::Array(job_context).to_string())
}

fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Response schema constraining each batch call to `{ "matches": [...] }`.
fn match_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "matches": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "jobId": { "type": "STRING" },
                        "fitScore": { "type": "INTEGER" },
                        "fitLabel": { "type": "STRING", "enum": ["High", "Medium", "Low"] },
                        "reasoning": { "type": "STRING" },
                        "missingSkills": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["jobId", "fitScore", "fitLabel", "reasoning"]
                }
            }
        },
        "required": ["matches"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::analysis::FeedbackStatus;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Fake model that pops a scripted response per call and records how
    /// many calls were made and with which prompts.
    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn generate_structured(
            &self,
            parts: &[Part],
            _system: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            if let Some(Part::Text(prompt)) = parts.first() {
                self.prompts.lock().unwrap().push(prompt.clone());
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    /// Model whose calls never complete within the batch timeout.
    struct HungModel;

    #[async_trait]
    impl TextModel for HungModel {
        async fn generate_structured(
            &self,
            _parts: &[Part],
            _system: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("{\"matches\": []}".to_string())
        }
    }

    fn sample_analysis() -> ResumeAnalysis {
        ResumeAnalysis {
            ats_score: 78,
            summary: "Backend engineer focused on distributed systems.".to_string(),
            detected_role: "Backend Engineer".to_string(),
            top_skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            experience_level: "Mid".to_string(),
            skills_feedback: "Good depth".to_string(),
            skills_status: FeedbackStatus::Strong,
            experience_feedback: "Quantify impact".to_string(),
            experience_status: FeedbackStatus::Improve,
            keywords_feedback: "Add cloud keywords".to_string(),
            keywords_status: FeedbackStatus::Improve,
            formatting_feedback: "Clean layout".to_string(),
            formatting_status: FeedbackStatus::Strong,
            improvement_tips: vec![],
        }
    }

    fn sample_jobs(n: usize) -> Vec<JobRow> {
        (0..n)
            .map(|i| JobRow {
                id: Uuid::new_v4(),
                title: format!("Job {i}"),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                job_type: "Full-time".to_string(),
                description: "A job description that is long enough to exercise truncation \
                              in the prompt builder without being unrealistic about it."
                    .to_string(),
                requirements: vec!["Rust".to_string(), "SQL".to_string()],
                salary_range: None,
                is_active: true,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn batch_response(jobs: &[JobRow]) -> String {
        let matches: Vec<Value> = jobs
            .iter()
            .map(|j| {
                json!({
                    "jobId": j.id,
                    "fitScore": 70,
                    "fitLabel": "Medium",
                    "reasoning": "Reasonable overlap.",
                    "missingSkills": ["Kubernetes"]
                })
            })
            .collect();
        json!({ "matches": matches }).to_string()
    }

    #[tokio::test]
    async fn test_issues_ceil_n_over_b_calls_and_returns_subset() {
        let jobs = sample_jobs(5);
        let model = ScriptedModel::new(vec![
            Ok(batch_response(&jobs[0..2])),
            Ok(batch_response(&jobs[2..4])),
            Ok(batch_response(&jobs[4..5])),
        ]);

        let matches = match_jobs(&model, &sample_analysis(), &jobs).await;

        assert_eq!(model.call_count(), 3); // ⌈5/2⌉
        assert_eq!(matches.len(), 5);
        let input_ids: HashSet<Uuid> = jobs.iter().map(|j| j.id).collect();
        assert!(matches.iter().all(|m| input_ids.contains(&m.job_id)));
    }

    #[tokio::test]
    async fn test_failed_middle_batch_keeps_other_batches() {
        // Catalog of 5, batch size 2 → calls of sizes 2, 2, 1.
        let jobs = sample_jobs(5);
        let model = ScriptedModel::new(vec![
            Ok(batch_response(&jobs[0..2])),
            Ok("{\"matches\": [{\"jobId\": not even json".to_string()),
            Ok(batch_response(&jobs[4..5])),
        ]);

        let matches = match_jobs(&model, &sample_analysis(), &jobs).await;

        assert_eq!(model.call_count(), 3);
        let got: Vec<Uuid> = matches.iter().map(|m| m.job_id).collect();
        assert_eq!(got, vec![jobs[0].id, jobs[1].id, jobs[4].id]);
    }

    #[tokio::test]
    async fn test_all_batches_failing_returns_empty_without_error() {
        let jobs = sample_jobs(4);
        let model = ScriptedModel::new(vec![
            Err(LlmError::EmptyContent),
            Err(LlmError::Api {
                status: 500,
                message: "upstream".to_string(),
            }),
        ]);

        let matches = match_jobs(&model, &sample_analysis(), &jobs).await;

        assert_eq!(model.call_count(), 2);
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_job_ids_are_dropped() {
        let jobs = sample_jobs(2);
        let response = json!({
            "matches": [
                {
                    "jobId": jobs[0].id,
                    "fitScore": 90,
                    "fitLabel": "High",
                    "reasoning": "Strong fit.",
                    "missingSkills": []
                },
                {
                    "jobId": Uuid::new_v4(), // not in the snapshot
                    "fitScore": 40,
                    "fitLabel": "Low",
                    "reasoning": "Echoed a job we never sent.",
                    "missingSkills": []
                }
            ]
        });
        let model = ScriptedModel::new(vec![Ok(response.to_string())]);

        let matches = match_jobs(&model, &sample_analysis(), &jobs).await;

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].job_id, jobs[0].id);
    }

    #[tokio::test]
    async fn test_fenced_batch_response_parses() {
        let jobs = sample_jobs(1);
        let fenced = format!("```json\n{}\n```", batch_response(&jobs));
        let model = ScriptedModel::new(vec![Ok(fenced)]);

        let matches = match_jobs(&model, &sample_analysis(), &jobs).await;

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].missing_skills, vec!["Kubernetes".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_call_counts_as_failed_batch() {
        let jobs = sample_jobs(2);
        let matches = match_jobs(&HungModel, &sample_analysis(), &jobs).await;
        assert!(matches.is_empty());
    }

    #[test]
    fn test_prompt_truncates_description_but_keeps_requirements() {
        let mut jobs = sample_jobs(1);
        jobs[0].description = "x".repeat(500);
        let prompt = build_match_prompt(&sample_analysis(), "Rust, SQL", &jobs);
        assert!(prompt.contains(&"x".repeat(DESCRIPTION_SNIPPET_CHARS)));
        assert!(!prompt.contains(&"x".repeat(DESCRIPTION_SNIPPET_CHARS + 1)));
        assert!(prompt.contains("\"Rust\""));
        assert!(prompt.contains("\"SQL\""));
    }
}
