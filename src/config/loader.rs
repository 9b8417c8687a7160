use super::{global_config_path, CoachConfig, ConfigLayer};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Resolves a [`CoachConfig`] from files, environment and overrides
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: CoachConfig,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the per-user config file if it exists
    pub async fn load_global(mut self) -> Result<Self> {
        match global_config_path() {
            Ok(path) if path.exists() => {
                self.config.apply(read_layer(&path).await?);
            }
            Ok(path) => debug!("No global config at {}", path.display()),
            Err(e) => debug!("Skipping global config: {e}"),
        }
        Ok(self)
    }

    /// Apply an explicitly requested config file, which must exist
    pub async fn load_file(mut self, path: &Path) -> Result<Self> {
        self.config.apply(read_layer(path).await?);
        Ok(self)
    }

    pub fn merge_env_vars(self) -> Self {
        self.merge_layer(ConfigLayer::from_env())
    }

    pub fn merge_layer(mut self, layer: ConfigLayer) -> Self {
        self.config.apply(layer);
        self
    }

    pub fn build(self) -> Result<CoachConfig> {
        self.config.validate()?;
        debug!("Resolved configuration: {:?}", self.config);
        Ok(self.config)
    }

    /// Standard resolution order: global file, `explicit` file, environment,
    /// then `overrides`
    pub async fn resolve(explicit: Option<PathBuf>, overrides: ConfigLayer) -> Result<CoachConfig> {
        let mut loader = Self::new().load_global().await?;
        if let Some(path) = explicit {
            loader = loader.load_file(&path).await?;
        }
        loader.merge_env_vars().merge_layer(overrides).build()
    }
}

async fn read_layer(path: &Path) -> Result<ConfigLayer> {
    debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ConfigLayer::from_toml(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))
}
