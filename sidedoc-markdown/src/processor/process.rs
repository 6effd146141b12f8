//! File-level entry points.
use std::{fs, path::Path};

use log::debug;

use super::types::DocumentProcessor;
use crate::{error::RenderError, types::RenderedDocument};

/// Read a Markdown file and render it.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be read or is not valid
/// UTF-8.
pub fn render_file(
  processor: &DocumentProcessor,
  path: &Path,
) -> Result<RenderedDocument, RenderError> {
  let content = fs::read_to_string(path).map_err(|source| {
    RenderError::Io {
      path: path.to_path_buf(),
      source,
    }
  })?;

  debug!("Rendering {} ({} bytes)", path.display(), content.len());
  Ok(processor.render(&content))
}
