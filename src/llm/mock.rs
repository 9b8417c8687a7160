//! Scripted generative client for tests

use super::{GenerativeClient, ServiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Returns predefined responses in order and records every prompt.
///
/// Clones share the same script and history.
#[derive(Clone, Default)]
pub struct MockGenerativeClient {
    responses: Arc<Mutex<VecDeque<Result<String, ServiceError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
}

impl MockGenerativeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay each completion, to exercise progress reporting
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a response for the next call
    pub async fn add_response(&self, response: Result<String, ServiceError>) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn add_success_response(&self, completion: &str) {
        self.add_response(Ok(completion.to_string())).await;
    }

    /// Prompts received so far, oldest first
    pub async fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Err(ServiceError::InvalidResponse(
                "no mock response configured".to_string(),
            ))
        })
    }
}
