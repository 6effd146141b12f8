use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for sidedoc-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Template error: {0}")]
  Template(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Failed to parse JSON config from {}: {source}", path.display())]
  Json {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("Failed to parse TOML config from {}: {source}", path.display())]
  Toml {
    path:   PathBuf,
    source: toml::de::Error,
  },
}
