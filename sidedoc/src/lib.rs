//! Expose sidedoc's internal API for use in integration tests. It is not
//! meant as a stable library interface; use `sidedoc-markdown` directly to
//! embed the renderer.
pub mod cli;
pub mod error;
pub mod generate;
pub mod html;
pub mod output;
