//! Loading practice configuration (attempt budgets and per-topic difficulty overrides) from TOML.
//!
//! ```toml
//! [generator]
//! max_attempts = 60
//!
//! [topics.long-division]
//! max_level = 2
//! raise_after = 4
//! ```
//!
//! The file only carries overrides; validation against the built-in family
//! bounds happens in [`crate::catalog::Catalog::from_config`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{TopicId, UnknownTopic};

/// Environment variable naming the TOML file.
pub const CONFIG_PATH_ENV: &str = "PRACTICE_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PracticeConfig {
  #[serde(default)]
  pub generator: GeneratorCfg,
  /// Keyed by topic slug (aliases accepted).
  #[serde(default)]
  pub topics: BTreeMap<String, TopicCfg>,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneratorCfg {
  #[serde(default)] pub max_attempts: Option<u32>,
}

/// Per-topic override. Unset fields keep the built-in value.
#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TopicCfg {
  #[serde(default)] pub min_level: Option<u8>,
  #[serde(default)] pub max_level: Option<u8>,
  #[serde(default)] pub raise_after: Option<u32>,
  #[serde(default)] pub lower_after: Option<u32>,
  #[serde(default)] pub auto_next: Option<bool>,
  #[serde(default)] pub max_attempts: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Io { path: String, source: std::io::Error },
  #[error("invalid TOML config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error(transparent)]
  UnknownTopic(#[from] UnknownTopic),
  #[error("{topic}: levels {min}..={max} must lie within the supported {supported_min}..={supported_max}")]
  LevelBounds { topic: TopicId, min: u8, max: u8, supported_min: u8, supported_max: u8 },
  #[error("{scope}: {field} must be at least 1")]
  ZeroSetting { scope: String, field: &'static str },
}

impl PracticeConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(s)?)
  }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<PracticeConfig, ConfigError> {
  let path = path.as_ref();
  let s = std::fs::read_to_string(path)
    .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
  PracticeConfig::from_toml_str(&s)
}

/// Attempt to load `PracticeConfig` from PRACTICE_CONFIG_PATH. On any read/parse error, returns None.
pub fn load_config_from_env() -> Option<PracticeConfig> {
  let path = std::env::var(CONFIG_PATH_ENV).ok()?;
  match load_config(&path) {
    Ok(cfg) => {
      info!(target: "practice_engine", %path, topics = cfg.topics.len(), "Loaded practice config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "practice_engine", %path, error = %e, "Failed to load practice config");
      None
    }
  }
}
