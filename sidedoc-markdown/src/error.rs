use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced at the boundary of the rendering pipeline.
///
/// Malformed Markdown is never an error; the pipeline renders whatever
/// structure the parser produced.
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("Failed to read markdown source {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}
