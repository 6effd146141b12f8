//! Types for the sidedoc-markdown public API.
use serde::{Deserialize, Serialize};

/// One entry of the generated table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocEntry {
  /// Heading text (inline content, no markdown formatting).
  pub text:   String,
  /// Anchor ID of the heading, unique within the document.
  pub anchor: String,
  /// Heading level (1-6).
  pub level:  u8,
}

/// Result of rendering one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedDocument {
  /// Rendered body: the sidebar followed by the content region.
  pub html: String,

  /// Table of contents entries in document order.
  pub toc: Vec<TocEntry>,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,

  /// Number of code blocks that received a copy button.
  pub code_blocks: usize,
}
