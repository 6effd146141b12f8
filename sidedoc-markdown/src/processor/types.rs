//! Type definitions for the document processor.
//!
//! # Examples
//!
//! ```
//! use sidedoc_markdown::{DocumentProcessor, RenderOptionsBuilder};
//!
//! let options = RenderOptionsBuilder::new()
//!   .toc_title(Some("Contents"))
//!   .toc_levels(1, 2)
//!   .copy_label("Copy")
//!   .build();
//!
//! let processor = DocumentProcessor::new(options);
//! ```
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which implementation renders the document.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
  /// Parse with comrak and post-process the document tree.
  #[default]
  Tree,
  /// Scan the raw source line by line.
  Lines,
}

impl fmt::Display for RenderMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Tree => write!(f, "tree"),
      Self::Lines => write!(f, "lines"),
    }
  }
}

impl FromStr for RenderMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "tree" => Ok(Self::Tree),
      "lines" => Ok(Self::Lines),
      other => Err(format!("unknown render mode '{other}'")),
    }
  }
}

/// Options for configuring the document processor.
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct RenderOptions {
  /// Rendering implementation.
  pub mode: RenderMode,

  /// Enable GitHub Flavored Markdown tables, strikethrough and task lists.
  pub gfm: bool,

  /// Optional title shown at the top of the table of contents.
  pub toc_title: Option<String>,

  /// Shallowest heading level listed in the table of contents.
  pub toc_min_level: u8,

  /// Deepest heading level listed in the table of contents.
  pub toc_max_level: u8,

  /// Append a `¶` permalink to every heading.
  pub permalink: bool,

  /// Wrap heading text in a link to its own anchor.
  pub anchorlink: bool,

  /// Label of the copy button appended to code blocks.
  pub copy_label: String,

  /// Make external links open in a new browsing context.
  pub external_links_new_tab: bool,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      mode:                   RenderMode::Tree,
      gfm:                    cfg!(feature = "gfm"),
      toc_title:              None,
      toc_min_level:          1,
      toc_max_level:          3,
      permalink:              true,
      anchorlink:             false,
      copy_label:             "Copy code".to_string(),
      external_links_new_tab: true,
    }
  }
}

impl RenderOptions {
  /// Whether a heading of `level` is listed in the table of contents.
  #[must_use]
  pub const fn in_toc(&self, level: u8) -> bool {
    level >= self.toc_min_level && level <= self.toc_max_level
  }
}

/// Main document processor.
///
/// Holds only immutable options; every call to
/// [`render`](DocumentProcessor::render) starts from fresh per-document state.
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
  pub(crate) options: RenderOptions,
}

/// Builder for constructing `RenderOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct RenderOptionsBuilder {
  options: RenderOptions,
}

impl RenderOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: RenderOptions::default(),
    }
  }

  /// Select the rendering implementation.
  #[must_use]
  pub const fn mode(mut self, mode: RenderMode) -> Self {
    self.options.mode = mode;
    self
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Set the table of contents title.
  #[must_use]
  pub fn toc_title<S: Into<String>>(mut self, title: Option<S>) -> Self {
    self.options.toc_title = title.map(Into::into);
    self
  }

  /// Set the range of heading levels listed in the table of contents.
  #[must_use]
  pub const fn toc_levels(mut self, min: u8, max: u8) -> Self {
    self.options.toc_min_level = min;
    self.options.toc_max_level = max;
    self
  }

  /// Enable or disable heading permalinks.
  #[must_use]
  pub const fn permalink(mut self, enabled: bool) -> Self {
    self.options.permalink = enabled;
    self
  }

  /// Enable or disable self-links on heading text.
  #[must_use]
  pub const fn anchorlink(mut self, enabled: bool) -> Self {
    self.options.anchorlink = enabled;
    self
  }

  /// Set the copy button label.
  #[must_use]
  pub fn copy_label<S: Into<String>>(mut self, label: S) -> Self {
    self.options.copy_label = label.into();
    self
  }

  /// Enable or disable opening external links in a new tab.
  #[must_use]
  pub const fn external_links_new_tab(mut self, enabled: bool) -> Self {
    self.options.external_links_new_tab = enabled;
    self
  }

  /// Build the final `RenderOptions`.
  #[must_use]
  pub fn build(self) -> RenderOptions {
    self.options
  }
}

impl Default for RenderOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_render_mode_parsing() {
    assert_eq!("tree".parse::<RenderMode>(), Ok(RenderMode::Tree));
    assert_eq!("Lines".parse::<RenderMode>(), Ok(RenderMode::Lines));
    assert!("dom".parse::<RenderMode>().is_err());
    assert_eq!(RenderMode::Lines.to_string(), "lines");
  }

  #[test]
  fn test_builder_sets_levels() {
    let options = RenderOptionsBuilder::new()
      .toc_levels(2, 4)
      .permalink(false)
      .build();
    assert!(!options.in_toc(1));
    assert!(options.in_toc(2));
    assert!(options.in_toc(4));
    assert!(!options.in_toc(5));
    assert!(!options.permalink);
  }
}
