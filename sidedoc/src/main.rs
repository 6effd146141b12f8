use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use sidedoc::{
  cli::{Cli, Commands},
  generate::generate_page,
};
use sidedoc_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Some(Commands::Init {
      output,
      format,
      force,
    }) => {
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize the \
         generated page."
      );
      return Ok(());
    },

    Some(Commands::Export {
      output_dir,
      force,
      templates,
    }) => {
      Config::export_templates(output_dir, *force, Some(templates.clone()))
        .wrap_err_with(|| {
          format!("Failed to export templates to {}", output_dir.display())
        })?;
      return Ok(());
    },

    // Html arguments are merged into the loaded config below
    Some(Commands::Html { .. }) | None => {},
  }

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  cli.apply_to(&mut config);
  config
    .validate()
    .wrap_err("Invalid configuration after applying command line arguments")?;

  generate_page(&config).wrap_err_with(|| {
    format!("Failed to generate {}", config.output.display())
  })?;

  Ok(())
}
