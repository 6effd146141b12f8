use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sidedoc_config::Config;
use sidedoc_markdown::RenderMode;

/// Command line interface for sidedoc
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Render a Markdown document into a page with a sidebar table of \
           contents"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the sidedoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new sidedoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "sidedoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export the default page template, stylesheet and script for
  /// customization.
  Export {
    /// Output directory for template files.
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,

    /// Specific templates to export (e.g., html, css, js). If not specified,
    /// exports all.
    #[arg(short, long, action = clap::ArgAction::Append)]
    templates: Vec<String>,
  },

  /// Render a Markdown document to an HTML page.
  Html {
    /// Markdown file to render.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// HTML file to write.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use the line-oriented renderer instead of the full Markdown parser.
    #[arg(long)]
    lines: bool,

    /// Page title. Defaults to the first level-1 heading.
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Path to a custom page template.
    #[arg(short, long)]
    template: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Merge arguments of the `html` subcommand into `config`, prioritizing
  /// CLI values when present.
  pub fn apply_to(&self, config: &mut Config) {
    if let Some(Commands::Html {
      input,
      output,
      lines,
      title,
      template,
    }) = &self.command
    {
      if let Some(input) = input {
        config.input.clone_from(input);
      }

      if let Some(output) = output {
        config.output.clone_from(output);
      }

      if *lines {
        config.mode = RenderMode::Lines;
      }

      if let Some(title) = title {
        config.title = Some(title.clone());
      }

      if let Some(template) = template {
        config.template_path = Some(template.clone());
      }
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_no_subcommand_with_globals() {
    let cli = Cli::try_parse_from([
      "sidedoc",
      "-v",
      "-c",
      "base.toml",
      "--config-file",
      "extra.json",
      "--config",
      "toc.max_level=2",
    ])
    .expect("valid arguments");

    assert!(cli.command.is_none());
    assert!(cli.verbose);
    assert_eq!(cli.config_files, [
      PathBuf::from("base.toml"),
      PathBuf::from("extra.json")
    ]);
    assert_eq!(cli.config_overrides, ["toc.max_level=2"]);
  }

  #[test]
  fn test_html_arguments_override_config() {
    let cli = Cli::try_parse_from([
      "sidedoc",
      "html",
      "-i",
      "course.md",
      "-o",
      "site/course.html",
      "--lines",
      "--title",
      "Django Course",
    ])
    .expect("valid arguments");

    let mut config = Config::default();
    cli.apply_to(&mut config);

    assert_eq!(config.input, PathBuf::from("course.md"));
    assert_eq!(config.output, PathBuf::from("site/course.html"));
    assert_eq!(config.mode, RenderMode::Lines);
    assert_eq!(config.title.as_deref(), Some("Django Course"));
    assert_eq!(config.template_path, None);
  }

  #[test]
  fn test_html_without_arguments_keeps_config() {
    let cli =
      Cli::try_parse_from(["sidedoc", "html"]).expect("valid arguments");

    let mut config = Config::default();
    cli.apply_to(&mut config);
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_init_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["sidedoc", "init", "-F", "yaml"]).is_err());

    let cli = Cli::try_parse_from(["sidedoc", "init", "-F", "json", "--force"])
      .expect("valid arguments");
    assert!(matches!(
      cli.command,
      Some(Commands::Init { ref format, force: true, .. }) if format == "json"
    ));
  }

  #[test]
  fn test_export_templates_are_collected() {
    let cli =
      Cli::try_parse_from(["sidedoc", "export", "-t", "css", "-t", "js"])
        .expect("valid arguments");
    assert!(matches!(
      cli.command,
      Some(Commands::Export { ref templates, .. }) if templates == &["css", "js"]
    ));
  }
}
