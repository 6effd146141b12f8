use log::info;
use sidedoc_config::Config;
use sidedoc_markdown::{DocumentProcessor, RenderedDocument, render_file};

use crate::{error::SidedocError, html::template, output::write_page};

/// Render the configured Markdown file and write the finished page.
///
/// Returns the processed document so callers can report on it.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the page template fails, or
/// the output cannot be written.
pub fn generate_page(
  config: &Config,
) -> Result<RenderedDocument, SidedocError> {
  info!(
    "Rendering {} -> {}",
    config.input.display(),
    config.output.display()
  );

  let processor = DocumentProcessor::new(config.render_options());
  let document = render_file(&processor, &config.input)?;

  let html = template::render(config, &document)?;
  write_page(&config.output, &html)?;

  info!(
    "Generated page with {} table of contents entries and {} code blocks",
    document.toc.len(),
    document.code_blocks
  );
  Ok(document)
}
