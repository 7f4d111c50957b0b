use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use sweeper_core::{DifficultyLevel, EngineConfig};

/// Contents of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub user: Option<String>,
    pub full_name: Option<String>,
    pub level: Option<DifficultyLevel>,
    #[serde(flatten)]
    pub engine: EngineConfig,
}

impl FileConfig {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        if let Some(level) = config.level {
            config.engine = config.engine.with_level(level);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("Loaded {:?} from {}", config, path.display());
        Ok(config)
    }
}
