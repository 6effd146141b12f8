use std::{
  collections::HashMap,
  env,
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sidedoc_markdown::{RenderMode, RenderOptions, RenderOptionsBuilder};

use crate::error::ConfigError;

/// File names probed, in order, when no config file is given explicitly.
const CONFIG_FILENAMES: [&str; 4] =
  ["sidedoc.toml", "sidedoc.json", ".sidedoc.toml", ".sidedoc.json"];

/// Table of contents settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
  /// Heading shown above the table of contents.
  pub title: Option<String>,

  /// Shallowest heading level listed.
  pub min_level: u8,

  /// Deepest heading level listed.
  pub max_level: u8,

  /// Append a `¶` permalink to every heading.
  pub permalink: bool,

  /// Wrap heading text in a link to its own anchor.
  pub anchorlink: bool,
}

impl Default for TocConfig {
  fn default() -> Self {
    Self {
      title:      None,
      min_level:  1,
      max_level:  3,
      permalink:  true,
      anchorlink: false,
    }
  }
}

/// Code block settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
  /// Label of the copy button.
  pub copy_label: String,
}

impl Default for CodeConfig {
  fn default() -> Self {
    Self {
      copy_label: "Copy code".to_string(),
    }
  }
}

/// External link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
  /// Open `http://` and `https://` links in a new tab.
  pub new_tab: bool,
}

impl Default for LinksConfig {
  fn default() -> Self {
    Self { new_tab: true }
  }
}

/// `[toc]` keys set by a single config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TocLayer {
  pub title:      Option<String>,
  pub min_level:  Option<u8>,
  pub max_level:  Option<u8>,
  pub permalink:  Option<bool>,
  pub anchorlink: Option<bool>,
}

/// `[code]` keys set by a single config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodeLayer {
  pub copy_label: Option<String>,
}

/// `[links]` keys set by a single config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinksLayer {
  pub new_tab: Option<bool>,
}

/// The keys a single config file actually sets.
///
/// Unlike [`Config`], nothing here is defaulted, so merging a layer only
/// touches what the file mentions. See [`Config::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
  pub input:          Option<PathBuf>,
  pub output:         Option<PathBuf>,
  pub title:          Option<String>,
  pub mode:           Option<RenderMode>,
  pub template_path:  Option<PathBuf>,
  pub stylesheets:    Option<Vec<String>>,
  pub scripts:        Option<Vec<String>>,
  pub highlight_init: Option<bool>,
  pub toc:            Option<TocLayer>,
  pub code:           Option<CodeLayer>,
  pub links:          Option<LinksLayer>,
}

impl ConfigLayer {
  /// Read the keys set in a config file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    parse_config_file(path.as_ref())
  }
}

/// Configuration for the sidedoc page generator.
///
/// [`Config`] controls which Markdown file is rendered, where the page is
/// written, what the page shell references and how the table of contents,
/// code blocks and links are post-processed. Fields are typically loaded
/// from a TOML or JSON config file, but can also be set via CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Markdown source to render.
  pub input: PathBuf,

  /// HTML page to write.
  pub output: PathBuf,

  /// Page title. Falls back to the first level-1 heading.
  pub title: Option<String>,

  /// Renderer implementation.
  pub mode: RenderMode,

  /// Path to a custom page shell.
  pub template_path: Option<PathBuf>,

  /// Stylesheet URLs referenced from the page head.
  pub stylesheets: Vec<String>,

  /// Script URLs referenced from the page head.
  pub scripts: Vec<String>,

  /// Emit the `hljs.highlightAll()` initialiser.
  pub highlight_init: bool,

  /// Table of contents settings.
  pub toc: TocConfig,

  /// Code block settings.
  pub code: CodeConfig,

  /// External link settings.
  pub links: LinksConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input:          PathBuf::from("readme.md"),
      output:         PathBuf::from("readme.html"),
      title:          None,
      mode:           RenderMode::Tree,
      template_path:  None,
      stylesheets:    vec![
        "/js_css/main.css".to_string(),
        "/js_css/default.min.css".to_string(),
      ],
      scripts:        vec![
        "/js_css/copy.js".to_string(),
        "/js_css/highlight.min.js".to_string(),
      ],
      highlight_init: true,
      toc:            TocConfig::default(),
      code:           CodeConfig::default(),
      links:          LinksConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// Keys missing from the file take their default values.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    parse_config_file(path.as_ref())
  }

  /// Load configuration from files and `KEY=VALUE` overrides.
  ///
  /// Explicit files are merged in order: the first is loaded with
  /// [`Config::from_file`], later ones are read as [`ConfigLayer`]s and
  /// merged on top. Without any, a config file
  /// discovered by [`Config::find_config_file`] is used, and failing that
  /// the defaults. Overrides are applied last and the result is validated.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed,
  /// or the final configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        merged_config.merge(ConfigLayer::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Nested sections are addressed with dotted keys, e.g. `toc.max_level=2`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use sidedoc_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "toc.title=Contents".to_string(),
  ///     "links.new_tab=false".to_string(),
  ///   ])
  ///   .unwrap();
  /// assert!(!config.links.new_tab);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a configuration override by key.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value cannot be parsed.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "input" => self.input = PathBuf::from(value),
      "output" => self.output = PathBuf::from(value),
      "title" => self.title = non_empty(value),
      "mode" => {
        self.mode = value.parse().map_err(|e: String| {
          ConfigError::Config(format!(
            "Invalid value for 'mode': '{value}': {e}"
          ))
        })?;
      },
      "template_path" => self.template_path = non_empty(value).map(PathBuf::from),
      "stylesheets" => self.stylesheets = parse_list(value),
      "scripts" => self.scripts = parse_list(value),
      "highlight_init" => self.highlight_init = parse_bool(key, value)?,
      "toc.title" => self.toc.title = non_empty(value),
      "toc.min_level" => self.toc.min_level = parse_level(key, value)?,
      "toc.max_level" => self.toc.max_level = parse_level(key, value)?,
      "toc.permalink" => self.toc.permalink = parse_bool(key, value)?,
      "toc.anchorlink" => self.toc.anchorlink = parse_bool(key, value)?,
      "code.copy_label" => self.code.copy_label = value.to_string(),
      "links.new_tab" => self.links.new_tab = parse_bool(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Merge a config layer into this one, with the layer's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - Keys the layer does not set leave this config untouched
  /// - [`Vec<T>`] fields: the layer's entries not already present are appended
  /// - Any other key set by the layer replaces this config's value
  pub fn merge(&mut self, other: ConfigLayer) {
    if let Some(input) = other.input {
      self.input = input;
    }
    if let Some(output) = other.output {
      self.output = output;
    }
    if other.title.is_some() {
      self.title = other.title;
    }
    if let Some(mode) = other.mode {
      self.mode = mode;
    }
    if other.template_path.is_some() {
      self.template_path = other.template_path;
    }
    if let Some(stylesheets) = other.stylesheets {
      append_missing(&mut self.stylesheets, stylesheets);
    }
    if let Some(scripts) = other.scripts {
      append_missing(&mut self.scripts, scripts);
    }
    if let Some(highlight_init) = other.highlight_init {
      self.highlight_init = highlight_init;
    }

    if let Some(toc) = other.toc {
      if toc.title.is_some() {
        self.toc.title = toc.title;
      }
      if let Some(min_level) = toc.min_level {
        self.toc.min_level = min_level;
      }
      if let Some(max_level) = toc.max_level {
        self.toc.max_level = max_level;
      }
      if let Some(permalink) = toc.permalink {
        self.toc.permalink = permalink;
      }
      if let Some(anchorlink) = toc.anchorlink {
        self.toc.anchorlink = anchorlink;
      }
    }
    if let Some(copy_label) = other.code.and_then(|code| code.copy_label) {
      self.code.copy_label = copy_label;
    }
    if let Some(new_tab) = other.links.and_then(|links| links.new_tab) {
      self.links.new_tab = new_tab;
    }
  }

  /// Search for a config file in the working directory, then in
  /// `$XDG_CONFIG_HOME`.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(current_dir) = env::current_dir()
      && let Some(found) = Self::find_config_file_in(&current_dir)
    {
      return Some(found);
    }

    let xdg_config_home = env::var("XDG_CONFIG_HOME").ok()?;
    Self::find_config_file_in(&PathBuf::from(xdg_config_home))
  }

  /// Search `dir` for the first existing config file name.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Check that the configuration is usable.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found: heading levels outside
  /// 1-6, an inverted level range, a missing custom template, or an output
  /// path that would overwrite the input.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for (name, level) in [
      ("toc.min_level", self.toc.min_level),
      ("toc.max_level", self.toc.max_level),
    ] {
      if !(1..=6).contains(&level) {
        errors.push(format!("{name} must be between 1 and 6, got {level}"));
      }
    }

    if self.toc.min_level > self.toc.max_level {
      errors.push(format!(
        "toc.min_level ({}) is greater than toc.max_level ({})",
        self.toc.min_level, self.toc.max_level
      ));
    }

    if let Some(ref template_path) = self.template_path
      && !template_path.exists()
    {
      errors.push(format!(
        "Template file does not exist: {}",
        template_path.display()
      ));
    }

    if self.input == self.output {
      errors.push(format!(
        "Output path would overwrite the input: {}",
        self.output.display()
      ));
    }

    if self.code.copy_label.trim().is_empty() {
      log::warn!("code.copy_label is empty, copy buttons will have no label");
    }
    if self.highlight_init
      && !self.scripts.iter().any(|src| src.contains("highlight"))
    {
      log::warn!(
        "highlight_init is enabled but no highlight.js script is referenced"
      );
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Options for the Markdown renderer.
  #[must_use]
  pub fn render_options(&self) -> RenderOptions {
    RenderOptionsBuilder::new()
      .mode(self.mode)
      .toc_title(self.toc.title.clone())
      .toc_levels(self.toc.min_level, self.toc.max_level)
      .permalink(self.toc.permalink)
      .anchorlink(self.toc.anchorlink)
      .copy_label(self.code.copy_label.clone())
      .external_links_new_tab(self.links.new_tab)
      .build()
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)?;
    }

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization
  ///
  /// `templates` selects files by name (`default.html`) or extension
  /// (`css`); `all` or an empty selection exports everything. Existing files
  /// are kept unless `force` is set.
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
    templates: Option<Vec<String>>,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to create template directory: {}: {}",
        output_dir.display(),
        e
      ))
    })?;

    let mut templates_to_export: Vec<(&str, &str)> =
      Self::get_template_sources()
        .into_iter()
        .filter(|(name, _)| {
          templates.as_ref().is_none_or(|specified| {
            specified.is_empty()
              || specified.iter().any(|t| {
                t == "all"
                  || t.as_str() == *name
                  || name.ends_with(&format!(".{t}"))
              })
          })
        })
        .collect();
    templates_to_export.sort_unstable();

    for (filename, content) in templates_to_export {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to write template file: {}: {}",
          file_path.display(),
          e
        ))
      })?;
      log::info!("Exported template: {}", file_path.display());
    }

    Ok(())
  }

  /// Get mapping of template filenames to their embedded content
  fn get_template_sources() -> HashMap<&'static str, &'static str> {
    sidedoc_templates::all_templates()
  }
}

/// Deserialize a TOML or JSON file, chosen by extension.
#[allow(
  clippy::option_if_let_else,
  reason = "Clearer with explicit match on extension"
)]
fn parse_config_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
  let content = fs::read_to_string(path).map_err(|e| {
    ConfigError::Config(format!(
      "Failed to read config file: {}: {}",
      path.display(),
      e
    ))
  })?;

  match path.extension().and_then(|ext| ext.to_str()) {
    Some(ext) => {
      match ext.to_lowercase().as_str() {
        "json" => {
          serde_json::from_str(&content).map_err(|source| {
            ConfigError::Json {
              path: path.to_path_buf(),
              source,
            }
          })
        },
        "toml" => {
          toml::from_str(&content).map_err(|source| {
            ConfigError::Toml {
              path: path.to_path_buf(),
              source,
            }
          })
        },
        _ => {
          Err(ConfigError::Config(format!(
            "Unsupported config file format: {}",
            path.display()
          )))
        },
      }
    },
    None => {
      Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )))
    },
  }
}

fn non_empty(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

fn parse_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(ToString::to_string)
    .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" | "on" => Ok(true),
    "false" | "no" | "0" | "off" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_level(key: &str, value: &str) -> Result<u8, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!("Invalid value for '{key}': '{value}'"))
  })
}

fn append_missing(target: &mut Vec<String>, other: Vec<String>) {
  for item in other {
    if !target.contains(&item) {
      target.push(item);
    }
  }
}
