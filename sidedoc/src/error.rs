use std::{io, path::PathBuf};

use sidedoc_config::ConfigError;
use sidedoc_markdown::RenderError;
use thiserror::Error;

/// Top-level error type for the sidedoc crate.
#[derive(Debug, Error)]
pub enum SidedocError {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Template error: {0}")]
  Template(String),

  #[error(transparent)]
  Render(#[from] RenderError),

  #[error("Failed to write {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

impl From<tera::Error> for SidedocError {
  fn from(e: tera::Error) -> Self {
    Self::Template(e.to_string())
  }
}
