//! # Resume Coach
//!
//! A terminal resume coach backed by a generative text model. Each feature
//! renders a prompt, calls the model once, and turns the reply into a
//! validated record (or trimmed free text) ready to display and download.
//!
//! ## Usage
//!
//! ```bash
//! resume-coach ats --resume resume.pdf
//! resume-coach ats-jd --resume resume.pdf --jd job.txt --suggest
//! ```
//!
//! ## Modules
//!
//! - `config` - Layered configuration (files, environment, flags)
//! - `extract` - PDF and plain text extraction
//! - `llm` - Generative service client trait, Gemini client and mock
//! - `normalize` - Turns raw completions into schema-checked records
//! - `orchestrator` - Prompt rendering, the service call, and progress
//! - `render` - Terminal reports, spinner and result files
//! - `session` - One configured session running features end to end
//! - `task` - Feature catalogue, response schemas and prompt templates
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod normalize;
pub mod orchestrator;
pub mod render;
pub mod session;
pub mod task;

pub use error::{CoachError, Result};
pub use session::{CoachSession, FeatureOutcome, FeatureResult};
pub use task::{Feature, TaskRequest};
