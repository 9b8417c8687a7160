use thiserror::Error;

use crate::extract::ExtractionError;
use crate::llm::ServiceError;
use crate::normalize::NormalizeError;

/// Errors surfaced by a single coach action
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Document extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Generative service error: {0}")]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoachError {
    /// Name of the pipeline stage that failed, for user-facing reports
    pub fn stage(&self) -> &'static str {
        match self {
            CoachError::Extraction(_) => "document extraction",
            CoachError::Service(_) => "generative service",
            CoachError::Normalize(_) => "response parsing",
            CoachError::MissingInput(_) => "input",
            CoachError::Config(_) => "configuration",
            CoachError::Template(_) => "prompt rendering",
            CoachError::Io(_) | CoachError::Serialization(_) => "output",
        }
    }

    /// Raw completion text carried by a malformed-response failure
    pub fn raw_completion(&self) -> Option<&str> {
        match self {
            CoachError::Normalize(NormalizeError::Malformed { raw, .. }) => Some(raw),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoachError>;
