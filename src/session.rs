//! One configured coaching session
//!
//! A [`CoachSession`] owns the resolved configuration and the service client.
//! Each [`run`](CoachSession::run) is independent: render, call once,
//! normalize, return.

use crate::config::CoachConfig;
use crate::error::{CoachError, Result};
use crate::llm::{self, GeminiClient, GenerativeClient};
use crate::normalize::{Normalized, Normalizer};
use crate::orchestrator::{PromptOrchestrator, ProgressReporter, RawCompletion};
use crate::task::{Feature, TaskRequest};
use tracing::{info, warn};

/// Result of one feature run
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureOutcome {
    pub feature: Feature,
    /// File name of the downloadable artifact, without extension
    pub artifact_name: String,
    pub result: FeatureResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureResult {
    /// Schema-backed features
    Structured(Normalized),
    /// Free-text features, trimmed
    Text(String),
}

impl FeatureOutcome {
    /// Contents of the downloadable artifact
    pub fn artifact_text(&self) -> Result<String> {
        match &self.result {
            FeatureResult::Structured(normalized) => Ok(normalized.record.to_artifact()?),
            FeatureResult::Text(text) => Ok(text.clone()),
        }
    }

    pub fn structured(&self) -> Option<&Normalized> {
        match &self.result {
            FeatureResult::Structured(normalized) => Some(normalized),
            FeatureResult::Text(_) => None,
        }
    }
}

pub struct CoachSession {
    config: CoachConfig,
    client: Box<dyn GenerativeClient>,
    orchestrator: PromptOrchestrator,
    normalizer: Normalizer,
}

impl CoachSession {
    /// Build a session backed by Gemini; fails without an API key
    pub fn from_config(config: CoachConfig) -> Result<Self> {
        let client = GeminiClient::new(config.gemini_config()?)?;
        info!(model = client.model(), "Using Gemini");
        Self::with_client(config, Box::new(client))
    }

    /// Build a session around any client
    pub fn with_client(config: CoachConfig, client: Box<dyn GenerativeClient>) -> Result<Self> {
        let orchestrator = PromptOrchestrator::new(config.heartbeat())?;
        let normalizer = Normalizer::with_extra_field_policy(config.extra_fields);
        Ok(Self {
            config,
            client,
            orchestrator,
            normalizer,
        })
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Probe the service with a trivial prompt
    pub async fn validate_credential(&self) -> Result<()> {
        llm::probe(self.client.as_ref()).await?;
        Ok(())
    }

    /// Run one feature end to end
    pub async fn run(
        &self,
        request: &TaskRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<FeatureOutcome> {
        let feature = request.feature();
        let completion = self
            .orchestrator
            .run(self.client.as_ref(), request, progress)
            .await?;
        let result = self.interpret(feature, completion)?;

        info!(feature = feature.slug(), "Feature completed");
        Ok(FeatureOutcome {
            feature,
            artifact_name: request.artifact_name(),
            result,
        })
    }

    fn interpret(&self, feature: Feature, completion: RawCompletion) -> Result<FeatureResult> {
        let Some(schema) = feature.schema() else {
            let text = completion.as_str().trim();
            if text.is_empty() {
                return Err(CoachError::Service(llm::ServiceError::InvalidResponse(
                    "empty completion".to_string(),
                )));
            }
            return Ok(FeatureResult::Text(text.to_string()));
        };

        let normalized = self.normalizer.normalize(completion.as_str(), schema)?;
        if !normalized.warnings.is_empty() {
            warn!(
                feature = feature.slug(),
                count = normalized.warnings.len(),
                "Response normalized with warnings"
            );
        }
        Ok(FeatureResult::Structured(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerativeClient;
    use crate::normalize::{ExtraFieldPolicy, NormalizeError};
    use crate::orchestrator::NoProgress;

    fn session(mock: &MockGenerativeClient) -> CoachSession {
        CoachSession::with_client(CoachConfig::default(), Box::new(mock.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_structured_feature() {
        let mock = MockGenerativeClient::new();
        mock.add_success_response(
            r#"{"ATS_Score": "78%", "Strengths": ["Clear"], "Improvements": [], "Keywords": ["Rust"], "Formatting": "Good"}"#,
        )
        .await;

        let outcome = session(&mock)
            .run(
                &TaskRequest::AtsResume {
                    resume: "Jane Doe".to_string(),
                },
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(outcome.artifact_name, "ats_analysis_results");
        let normalized = outcome.structured().unwrap();
        assert_eq!(normalized.record.score("ATS_Score"), Some(78.0));
        assert!(outcome.artifact_text().unwrap().contains("\"ATS_Score\": 78.0"));
    }

    #[tokio::test]
    async fn test_free_text_feature_is_trimmed() {
        let mock = MockGenerativeClient::new();
        mock.add_success_response("\n  Acme builds rockets.  \n").await;

        let outcome = session(&mock)
            .run(
                &TaskRequest::CompanyInfo {
                    company: "Acme".to_string(),
                },
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(outcome.result, FeatureResult::Text("Acme builds rockets.".to_string()));
        assert_eq!(outcome.artifact_name, "Acme_info");
        assert_eq!(outcome.artifact_text().unwrap(), "Acme builds rockets.");
    }

    #[tokio::test]
    async fn test_malformed_response_keeps_raw_text() {
        let mock = MockGenerativeClient::new();
        mock.add_success_response("I cannot help with that.").await;

        let err = session(&mock)
            .run(
                &TaskRequest::AnalyzeJobDescription {
                    job_description: "Backend engineer".to_string(),
                },
                &NoProgress,
            )
            .await
            .unwrap_err();

        assert_eq!(err.raw_completion(), Some("I cannot help with that."));
    }

    #[tokio::test]
    async fn test_session_uses_configured_extra_field_policy() {
        let mock = MockGenerativeClient::new();
        mock.add_success_response(
            r#"{"Essential_Skills": [], "Key_Qualifications": [], "Main_Responsibilities": [], "Company_Culture": [], "Resume_Keywords": [], "Salary": "n/a"}"#,
        )
        .await;
        let config = CoachConfig {
            extra_fields: ExtraFieldPolicy::Reject,
            ..Default::default()
        };
        let session = CoachSession::with_client(config, Box::new(mock.clone())).unwrap();

        let err = session
            .run(
                &TaskRequest::AnalyzeJobDescription {
                    job_description: "Backend engineer".to_string(),
                },
                &NoProgress,
            )
            .await
            .unwrap_err();

        match err {
            CoachError::Normalize(NormalizeError::SchemaViolation(violation)) => {
                assert_eq!(violation.unexpected, vec!["Salary".to_string()]);
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validate_credential_probes_once() {
        let mock = MockGenerativeClient::new();
        mock.add_success_response("ok").await;

        session(&mock).validate_credential().await.unwrap();
        assert_eq!(mock.get_prompts().await, vec![llm::PROBE_PROMPT.to_string()]);
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let result = CoachSession::from_config(CoachConfig::default());
        assert!(matches!(result, Err(CoachError::Config(_))));
    }
}
