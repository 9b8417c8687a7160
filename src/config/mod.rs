//! Runtime configuration
//!
//! Settings are layered: built-in defaults, the global `config.toml`, an
//! explicit `--config` file, environment variables, then command-line flags.
//! Each source is a [`ConfigLayer`] of optional values; later layers win.

pub mod loader;

pub use loader::ConfigLoader;

use crate::error::CoachError;
use crate::llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::llm::GeminiClientConfig;
use crate::normalize::ExtraFieldPolicy;
use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables checked for the API key, highest priority first
pub const API_KEY_ENV_VARS: [&str; 3] = ["RESUME_COACH_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Path of the per-user configuration file
pub fn global_config_path() -> Result<PathBuf> {
    ProjectDirs::from("com", "resume-coach", "resume-coach")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Fully resolved settings for one session
#[derive(Clone, PartialEq)]
pub struct CoachConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Interval between progress heartbeats
    pub heartbeat_ms: u64,
    pub output_dir: PathBuf,
    /// Write a result file after each feature run
    pub download: bool,
    pub extra_fields: ExtraFieldPolicy,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.4,
            timeout_secs: 120,
            heartbeat_ms: 250,
            output_dir: PathBuf::from("."),
            download: true,
            extra_fields: ExtraFieldPolicy::default(),
        }
    }
}

impl fmt::Debug for CoachConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoachConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("heartbeat_ms", &self.heartbeat_ms)
            .field("output_dir", &self.output_dir)
            .field("download", &self.download)
            .field("extra_fields", &self.extra_fields)
            .finish()
    }
}

/// One source of settings; unset values leave the lower layer untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub heartbeat_ms: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub download: Option<bool>,
    pub extra_fields: Option<ExtraFieldPolicy>,
}

impl ConfigLayer {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read settings from environment variables through `lookup`
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            api_key: API_KEY_ENV_VARS.iter().find_map(|name| non_empty(*name)),
            model: non_empty("RESUME_COACH_MODEL"),
            endpoint: non_empty("RESUME_COACH_ENDPOINT"),
            output_dir: non_empty("RESUME_COACH_OUTPUT_DIR").map(PathBuf::from),
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }
}

impl CoachConfig {
    /// Overlay every value set in `layer`
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(api_key) = layer.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(model) = layer.model {
            self.model = model;
        }
        if let Some(endpoint) = layer.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(temperature) = layer.temperature {
            self.temperature = temperature;
        }
        if let Some(timeout_secs) = layer.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(heartbeat_ms) = layer.heartbeat_ms {
            self.heartbeat_ms = heartbeat_ms;
        }
        if let Some(output_dir) = layer.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(download) = layer.download {
            self.download = download;
        }
        if let Some(extra_fields) = layer.extra_fields {
            self.extra_fields = extra_fields;
        }
    }

    /// Reject values the service would refuse
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must not be empty"));
        }
        Ok(())
    }

    /// The credential, or a configuration error naming where to set it
    pub fn require_api_key(&self) -> Result<&str, CoachError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CoachError::Config(format!(
                    "no API key configured; set {} or pass --api-key",
                    API_KEY_ENV_VARS[0]
                ))
            })
    }

    pub fn gemini_config(&self) -> Result<GeminiClientConfig, CoachError> {
        Ok(GeminiClientConfig {
            api_key: self.require_api_key()?.to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        })
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }
}
