use std::{
  fs::{self, File},
  io::{self, BufWriter, Write},
  path::Path,
};

use log::{debug, info};

use crate::error::SidedocError;

/// Write the finished page to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`SidedocError::Write`] if a directory cannot be created or the
/// file cannot be written.
pub fn write_page(path: &Path, html: &str) -> Result<(), SidedocError> {
  let write_err = |source: io::Error| {
    SidedocError::Write {
      path: path.to_path_buf(),
      source,
    }
  };

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).map_err(write_err)?;
    debug!("Created directory: {}", parent.display());
  }

  let file = File::create(path).map_err(write_err)?;
  let mut writer = BufWriter::new(file);
  writer.write_all(html.as_bytes()).map_err(write_err)?;
  writer.flush().map_err(write_err)?;

  info!("Wrote {} ({} bytes)", path.display(), html.len());
  Ok(())
}
