//! Skill-Gap Call — one model call per (analysis, target role) pair.
//!
//! Fail-open like the matcher: any failure means "no identified gaps",
//! never an error state.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::llm_client::prompts::SKILL_GAP_SYSTEM;
use crate::llm_client::{parse_structured, Part, TextModel};
use crate::models::analysis::{ResumeAnalysis, SkillGap};

const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"RESUME SKILLS: {skills}
RESUME EXPERIENCE: {experience}
TARGET ROLE: {role}"#;

#[derive(Debug, Deserialize)]
struct GapEnvelope {
    #[serde(default)]
    gaps: Vec<SkillGap>,
}

/// Returns the skill gaps between an analyzed resume and a target role.
/// Empty on any call or parse failure.
pub async fn skill_gap_analysis(
    model: &dyn TextModel,
    analysis: &ResumeAnalysis,
    target_role: &str,
) -> Vec<SkillGap> {
    let prompt = SKILL_GAP_PROMPT_TEMPLATE
        .replace("{skills}", &analysis.top_skills.join(", "))
        .replace("{experience}", &analysis.experience_level)
        .replace("{role}", target_role);
    let parts = [Part::Text(prompt)];
    let schema = gap_response_schema();

    let text = match model
        .generate_structured(&parts, SKILL_GAP_SYSTEM, &schema)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("Skill gap call failed, returning no gaps: {e}");
            return Vec::new();
        }
    };

    match parse_structured::<GapEnvelope>(&text) {
        Ok(envelope) => envelope.gaps,
        Err(e) => {
            warn!("Skill gap response parse failed, returning no gaps: {e}");
            Vec::new()
        }
    }
}

fn gap_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "gaps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "skill": { "type": "STRING" },
                        "importance": { "type": "STRING", "enum": ["High", "Medium", "Low"] },
                        "recommendation": { "type": "STRING" }
                    },
                    "required": ["skill", "importance", "recommendation"]
                }
            }
        },
        "required": ["gaps"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::analysis::{FeedbackStatus, Importance};
    use async_trait::async_trait;

    struct FixedModel(Result<String, LlmError>);

    #[async_trait]
    impl TextModel for FixedModel {
        async fn generate_structured(
            &self,
            _parts: &[Part],
            _system: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            match &self.0 {
                Ok(s) => Ok(s.clone()),
                Err(_) => Err(LlmError::EmptyContent),
            }
        }
    }

    fn sample_analysis() -> ResumeAnalysis {
        ResumeAnalysis {
            ats_score: 65,
            summary: "Junior developer.".to_string(),
            detected_role: "Backend Developer".to_string(),
            top_skills: vec!["Node.js".to_string()],
            experience_level: "Entry".to_string(),
            skills_feedback: String::new(),
            skills_status: FeedbackStatus::Improve,
            experience_feedback: String::new(),
            experience_status: FeedbackStatus::Improve,
            keywords_feedback: String::new(),
            keywords_status: FeedbackStatus::Critical,
            formatting_feedback: String::new(),
            formatting_status: FeedbackStatus::Strong,
            improvement_tips: vec![],
        }
    }

    #[tokio::test]
    async fn test_gaps_parse_from_valid_response() {
        let body = json!({
            "gaps": [{
                "skill": "Kubernetes",
                "importance": "High",
                "recommendation": "Deploy a small service to a managed cluster."
            }]
        });
        let model = FixedModel(Ok(body.to_string()));
        let gaps = skill_gap_analysis(&model, &sample_analysis(), "Platform Engineer").await;
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].importance, Importance::High);
    }

    #[tokio::test]
    async fn test_call_failure_returns_empty() {
        let model = FixedModel(Err(LlmError::EmptyContent));
        let gaps = skill_gap_analysis(&model, &sample_analysis(), "Platform Engineer").await;
        assert!(gaps.is_empty());
    }

    #[tokio::test]
    async fn test_parse_failure_returns_empty() {
        let model = FixedModel(Ok("{\"gaps\": [{\"skill\": truncated".to_string()));
        let gaps = skill_gap_analysis(&model, &sample_analysis(), "Platform Engineer").await;
        assert!(gaps.is_empty());
    }
}
