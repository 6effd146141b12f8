pub mod config;
pub mod error;
pub mod templates;

pub use config::{
  CodeConfig,
  CodeLayer,
  Config,
  ConfigLayer,
  LinksConfig,
  LinksLayer,
  TocConfig,
  TocLayer,
};
pub use error::ConfigError;
