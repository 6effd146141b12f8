//! Document processing pipeline.
//!
//! # Architecture
//!
//! The processor module is organized into focused submodules:
//!
//! - [`core`]: comrak parse and construction of the arena tree
//! - [`toc`]: table of contents extraction and the content-region split
//! - [`passes`]: textual passes over serialized HTML (sidebar relabel, copy
//!   buttons, external links)
//! - [`lines`]: line-oriented variant that does not build a tree
//! - [`process`]: file-level entry points
//! - [`types`]: configuration and the processor struct
pub mod core;
pub mod lines;
pub mod passes;
pub mod process;
pub mod toc;
pub mod types;

pub use lines::render_lines;
pub use passes::{
  CodeBlockRegistry,
  decorate_code_blocks,
  relabel_sidebar,
  rewrite_external_links,
};
pub use process::render_file;
pub use toc::{build_toc, wrap_content};
pub use types::{
  DocumentProcessor,
  RenderMode,
  RenderOptions,
  RenderOptionsBuilder,
};
