//! Resume Analysis — the single fail-closed model call.
//!
//! There is only one unit of work here, so unlike the matcher there is no
//! partial-success mode: any failure surfaces to the caller.

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::prompts::ANALYSIS_SYSTEM;
use crate::llm_client::{parse_structured, Part, TextModel};
use crate::models::analysis::ResumeAnalysis;

const ANALYSIS_INSTRUCTION: &str = "Analyze this resume provided in the attachment.";

/// Submits the uploaded resume (base64 bytes + declared media type) and
/// returns the structured analysis. Errors on call failure, empty
/// response, or unparseable output.
pub async fn analyze_resume(
    model: &dyn TextModel,
    data_base64: String,
    mime_type: String,
) -> Result<ResumeAnalysis, AppError> {
    let parts = [
        Part::Document {
            mime_type,
            data: data_base64,
        },
        Part::Text(ANALYSIS_INSTRUCTION.to_string()),
    ];
    let schema = analysis_response_schema();

    let text = model
        .generate_structured(&parts, ANALYSIS_SYSTEM, &schema)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis call failed: {e}")))?;

    parse_structured::<ResumeAnalysis>(&text)
        .map_err(|e| AppError::Llm(format!("Resume analysis response invalid: {e}")))
}

/// Response schema constraining the call to the ResumeAnalysis shape.
fn analysis_response_schema() -> Value {
    let status = json!({ "type": "STRING", "enum": ["Strong", "Improve", "Critical"] });
    json!({
        "type": "OBJECT",
        "properties": {
            "atsScore": { "type": "INTEGER" },
            "summary": { "type": "STRING" },
            "detectedRole": { "type": "STRING" },
            "topSkills": { "type": "ARRAY", "items": { "type": "STRING" } },
            "experienceLevel": { "type": "STRING" },

            "skillsFeedback": { "type": "STRING" },
            "skillsStatus": status.clone(),

            "experienceFeedback": { "type": "STRING" },
            "experienceStatus": status.clone(),

            "keywordsFeedback": { "type": "STRING" },
            "keywordsStatus": status.clone(),

            "formattingFeedback": { "type": "STRING" },
            "formattingStatus": status,

            "improvementTips": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": [
            "atsScore", "summary", "detectedRole", "experienceLevel",
            "skillsFeedback", "skillsStatus",
            "experienceFeedback", "experienceStatus",
            "keywordsFeedback", "keywordsStatus",
            "formattingFeedback", "formattingStatus"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct FixedModel(Result<&'static str, LlmError>);

    #[async_trait]
    impl TextModel for FixedModel {
        async fn generate_structured(
            &self,
            _parts: &[Part],
            _system: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            match &self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(_) => Err(LlmError::EmptyContent),
            }
        }
    }

    const VALID_ANALYSIS: &str = r#"{
        "atsScore": 81,
        "summary": "Experienced data analyst.",
        "detectedRole": "Data Analyst",
        "topSkills": ["SQL", "Python"],
        "experienceLevel": "Senior",
        "skillsFeedback": "Strong analytical toolkit.",
        "skillsStatus": "Strong",
        "experienceFeedback": "Add outcomes.",
        "experienceStatus": "Improve",
        "keywordsFeedback": "Covers the essentials.",
        "keywordsStatus": "Strong",
        "formattingFeedback": "Dense second page.",
        "formattingStatus": "Improve",
        "improvementTips": ["Quantify impact"]
    }"#;

    #[tokio::test]
    async fn test_valid_response_parses() {
        let model = FixedModel(Ok(VALID_ANALYSIS));
        let analysis = analyze_resume(&model, "Zm9v".to_string(), "application/pdf".to_string())
            .await
            .unwrap();
        assert_eq!(analysis.ats_score, 81);
        assert_eq!(analysis.top_skills, vec!["SQL", "Python"]);
    }

    #[tokio::test]
    async fn test_call_failure_is_an_error() {
        let model = FixedModel(Err(LlmError::EmptyContent));
        let result =
            analyze_resume(&model, "Zm9v".to_string(), "application/pdf".to_string()).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_unparseable_response_is_an_error() {
        let model = FixedModel(Ok("not json at all"));
        let result =
            analyze_resume(&model, "Zm9v".to_string(), "application/pdf".to_string()).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
