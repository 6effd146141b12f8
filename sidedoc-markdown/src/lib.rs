//! # sidedoc-markdown
//!
//! Post-processing pipeline that turns a Markdown document into a page body
//! with a table of contents sidebar, a content region, copyable code blocks
//! and external links that open in a new tab.
//!
//! Markdown parsing is delegated to `comrak`. Everything that happens after
//! the parse is implemented here as a fixed sequence of passes: structural
//! passes over an arena-owned [`DocumentTree`], followed by textual passes
//! over the serialized HTML.
//!
//! ## Quick Start
//!
//! ```rust
//! use sidedoc_markdown::{DocumentProcessor, RenderOptions};
//!
//! let processor = DocumentProcessor::new(RenderOptions::default());
//! let result = processor.render("# Hello\n\n```python\nprint('hi')\n```\n");
//!
//! assert_eq!(result.toc.len(), 1);
//! assert_eq!(result.code_blocks, 1);
//! assert!(result.html.contains(r#"<div class="sidebar">"#));
//! ```
//!
//! ## Render modes
//!
//! [`RenderMode::Tree`] parses the document with comrak and works on the
//! resulting tree. [`RenderMode::Lines`] is a lighter, line-oriented variant
//! that recognises only headings, fenced code blocks and paragraphs. Both
//! produce the same table of contents and the same code-block decoration for
//! well-formed input.
//!
//! ```rust
//! use sidedoc_markdown::{DocumentProcessor, RenderMode, RenderOptions};
//!
//! let options = RenderOptions {
//!   mode: RenderMode::Lines,
//!   ..Default::default()
//! };
//! let result = DocumentProcessor::new(options).render("# Getting Started Guide\n");
//! assert_eq!(result.toc[0].anchor, "getting-started-guide");
//! ```

mod error;
pub mod processor;
pub mod tree;
mod types;
pub mod utils;

pub use crate::{
  error::RenderError,
  processor::{
    CodeBlockRegistry,
    DocumentProcessor,
    RenderMode,
    RenderOptions,
    RenderOptionsBuilder,
    render_file,
  },
  tree::{DocumentTree, NodeId},
  types::{RenderedDocument, TocEntry},
};
