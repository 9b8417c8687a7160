//! Prompt orchestration
//!
//! Renders the prompt for a [`TaskRequest`], calls the generative service once,
//! and reports progress for as long as the call is pending. There is no retry:
//! a [`ServiceError`](crate::llm::ServiceError) goes straight back to the caller.

pub mod progress;

pub use progress::{
    NoProgress, ProgressPhase, ProgressReporter, ProgressUpdate, RecordingProgress,
};

use crate::error::Result;
use crate::llm::{self, GenerativeClient};
use crate::task::{PromptEngine, TaskRequest};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

const MIN_HEARTBEAT: Duration = Duration::from_millis(10);

/// Verbatim model output for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion(String);

impl RawCompletion {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct PromptOrchestrator {
    engine: PromptEngine,
    heartbeat: Duration,
}

impl PromptOrchestrator {
    /// `heartbeat` is the interval between waiting signals
    pub fn new(heartbeat: Duration) -> Result<Self> {
        Ok(Self {
            engine: PromptEngine::new()?,
            heartbeat: heartbeat.max(MIN_HEARTBEAT),
        })
    }

    /// Validate inputs and render the instruction string
    pub fn prompt_for(&self, request: &TaskRequest) -> Result<String> {
        request.validate()?;
        self.engine.render(request)
    }

    /// Run one request against the service
    pub async fn run(
        &self,
        client: &dyn GenerativeClient,
        request: &TaskRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<RawCompletion> {
        let feature = request.feature();
        let prompt = self.prompt_for(request)?;
        info!(feature = feature.slug(), "Requesting completion");

        let started = Instant::now();
        let mut step = 0;
        progress.report(&ProgressUpdate {
            step,
            phase: ProgressPhase::Started,
            elapsed: Duration::ZERO,
        });

        let call = client.complete(&prompt);
        tokio::pin!(call);

        let mut ticker = tokio::time::interval(self.heartbeat);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        let result = loop {
            tokio::select! {
                result = &mut call => break result,
                _ = ticker.tick() => {
                    step += 1;
                    progress.report(&ProgressUpdate {
                        step,
                        phase: ProgressPhase::Waiting,
                        elapsed: started.elapsed(),
                    });
                }
            }
        };

        let elapsed = started.elapsed();
        progress.report(&ProgressUpdate {
            step: step + 1,
            phase: ProgressPhase::Finished {
                success: result.is_ok(),
            },
            elapsed,
        });

        match result {
            Ok(text) => {
                debug!(
                    feature = feature.slug(),
                    chars = text.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Completion received"
                );
                trace!("Completion body: {}", llm::log_preview(&text));
                Ok(RawCompletion::new(text))
            }
            Err(e) => {
                warn!(feature = feature.slug(), error = %e, "Generative service call failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;
    use crate::llm::{MockGenerativeClient, ServiceError};

    fn request() -> TaskRequest {
        TaskRequest::AnalyzeJobDescription {
            job_description: "Rust developer, remote".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_calls_service_once_with_rendered_prompt() {
        let orchestrator = PromptOrchestrator::new(Duration::from_millis(50)).unwrap();
        let mock = MockGenerativeClient::new();
        mock.add_success_response("{}").await;

        let completion = orchestrator
            .run(&mock, &request(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(completion.as_str(), "{}");
        let prompts = mock.get_prompts().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Rust developer, remote"));
        assert_eq!(prompts[0], orchestrator.prompt_for(&request()).unwrap());
    }

    #[tokio::test]
    async fn test_service_error_propagates_without_retry() {
        let orchestrator = PromptOrchestrator::new(Duration::from_millis(50)).unwrap();
        let mock = MockGenerativeClient::new();
        mock.add_response(Err(ServiceError::Quota("exhausted".to_string())))
            .await;
        mock.add_success_response("never used").await;

        let err = orchestrator
            .run(&mock, &request(), &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, CoachError::Service(ServiceError::Quota(_))));
        assert_eq!(mock.get_prompts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_service() {
        let orchestrator = PromptOrchestrator::new(Duration::from_millis(50)).unwrap();
        let mock = MockGenerativeClient::new();

        let err = orchestrator
            .run(
                &mock,
                &TaskRequest::CompanyInfo {
                    company: String::new(),
                },
                &NoProgress,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoachError::MissingInput(_)));
        assert!(mock.get_prompts().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_tied_to_call() {
        let orchestrator = PromptOrchestrator::new(Duration::from_millis(100)).unwrap();
        let mock = MockGenerativeClient::new().with_latency(Duration::from_millis(350));
        mock.add_success_response("done").await;
        let progress = RecordingProgress::new();

        orchestrator
            .run(&mock, &request(), &progress)
            .await
            .unwrap();

        let updates = progress.updates();
        assert_eq!(updates.first().unwrap().phase, ProgressPhase::Started);
        assert_eq!(
            updates.last().unwrap().phase,
            ProgressPhase::Finished { success: true }
        );
        let waiting = updates
            .iter()
            .filter(|u| u.phase == ProgressPhase::Waiting)
            .count();
        assert_eq!(waiting, 3);
        assert!(updates.windows(2).all(|pair| pair[0].step < pair[1].step));
    }

    #[tokio::test]
    async fn test_failed_call_reports_unsuccessful_finish() {
        let orchestrator = PromptOrchestrator::new(Duration::from_millis(50)).unwrap();
        let mock = MockGenerativeClient::new();
        mock.add_response(Err(ServiceError::Transport("reset".to_string())))
            .await;
        let progress = RecordingProgress::new();

        let _ = orchestrator.run(&mock, &request(), &progress).await;

        assert_eq!(
            progress.updates().last().unwrap().phase,
            ProgressPhase::Finished { success: false }
        );
    }
}
