use std::{borrow::Cow, fs, path::Path};

use log::debug;
use serde::Serialize;
use sidedoc_config::Config;
use sidedoc_markdown::{RenderedDocument, TocEntry};
use sidedoc_templates::DEFAULT_TEMPLATE;
use tera::Tera;

use crate::error::SidedocError;

/// Name the page shell is registered under. The `.html` suffix turns on
/// tera's autoescaping for everything not marked `safe`.
const TEMPLATE_NAME: &str = "default.html";

/// Values exposed to the page shell.
#[derive(Debug, Serialize)]
struct PageContext<'a> {
  title:             Cow<'a, str>,
  content:           &'a str,
  toc:               &'a [TocEntry],
  stylesheets:       &'a [String],
  scripts:           &'a [String],
  highlight_init:    bool,
  generator_version: &'static str,
}

/// Render the full HTML page around an already processed document body.
///
/// # Errors
///
/// Returns an error if a custom template cannot be read or the template
/// fails to parse or render.
pub fn render(
  config: &Config,
  document: &RenderedDocument,
) -> Result<String, SidedocError> {
  let mut tera = Tera::default();
  let template_content = get_template_content(config)?;
  tera.add_raw_template(TEMPLATE_NAME, &template_content)?;

  let page = PageContext {
    title:             page_title(config, document),
    content:           &document.html,
    toc:               &document.toc,
    stylesheets:       &config.stylesheets,
    scripts:           &config.scripts,
    highlight_init:    config.highlight_init,
    generator_version: env!("CARGO_PKG_VERSION"),
  };

  let tera_context = tera::Context::from_serialize(&page)?;
  let html = tera.render(TEMPLATE_NAME, &tera_context)?;
  Ok(html)
}

/// Configured title, else the document's first H1, else the input file name.
fn page_title<'a>(
  config: &'a Config,
  document: &'a RenderedDocument,
) -> Cow<'a, str> {
  config
    .title
    .as_deref()
    .or(document.title.as_deref())
    .map_or_else(
      || {
        config
          .input
          .file_stem()
          .map_or(Cow::Borrowed("Document"), |stem| stem.to_string_lossy())
      },
      Cow::Borrowed,
    )
}

/// Custom page shell if configured, the embedded one otherwise.
///
/// `template_path` may name the shell itself or a directory holding a
/// `default.html`, such as one written by `sidedoc export`.
fn get_template_content(
  config: &Config,
) -> Result<Cow<'static, str>, SidedocError> {
  let Some(template_path) = &config.template_path else {
    return Ok(Cow::Borrowed(DEFAULT_TEMPLATE));
  };

  let file = if template_path.is_dir() {
    template_path.join(TEMPLATE_NAME)
  } else {
    template_path.clone()
  };

  if !file.exists() {
    debug!(
      "No {} in {}, using the built-in template",
      TEMPLATE_NAME,
      template_path.display()
    );
    return Ok(Cow::Borrowed(DEFAULT_TEMPLATE));
  }

  read_template(&file).map(Cow::Owned)
}

fn read_template(path: &Path) -> Result<String, SidedocError> {
  fs::read_to_string(path).map_err(|e| {
    SidedocError::Template(format!(
      "Failed to read custom template file: {}. Check file permissions and \
       ensure the file is valid UTF-8: {e}",
      path.display()
    ))
  })
}
