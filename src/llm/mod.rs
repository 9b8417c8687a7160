//! Generative text service boundary
//!
//! The coach needs exactly one capability from a model provider: turn a prompt
//! into a completion. [`GenerativeClient`] abstracts that so the orchestrator
//! and session can be exercised with [`MockGenerativeClient`] in tests.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiClient, GeminiClientConfig};
pub use mock::MockGenerativeClient;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

/// Prompt used to check a credential before the first real request
pub const PROBE_PROMPT: &str = "Test";

/// Failures of a single service call. None of them are retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("quota or rate limit exceeded: {0}")]
    Quota(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid service response: {0}")]
    InvalidResponse(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

/// A provider that completes prompts
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Return the model's completion for `prompt`
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Longest prompt or completion prefix written to trace logs, in chars
pub(crate) const LOG_PREVIEW_CHARS: usize = 400;

/// Prefix of `text` for trace logging, cut on a char boundary
pub(crate) fn log_preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Validate a credential by issuing a trivial prompt
///
/// Any completion, even an empty one, counts as success; only a service
/// error means the credential or connection is unusable.
pub async fn probe(client: &dyn GenerativeClient) -> Result<(), ServiceError> {
    debug!("Probing generative service");
    client.complete(PROBE_PROMPT).await?;
    info!("Generative service credential validated");
    Ok(())
}
