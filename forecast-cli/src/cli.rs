use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastService};
use inquire::{CustomType, Text};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Open-Meteo forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit the configuration file.
    Configure,

    /// Print a human-readable forecast for a location.
    Show {
        /// Latitude in decimal degrees.
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in decimal degrees.
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Save a diagnostic forecast snapshot and print its path.
    Save {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Directory for the snapshot; overrides `data_dir` from the config.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        debug!(?config, "loaded configuration");

        match self.command {
            Command::Configure => {
                configure(&mut config)?;
                let path = config.save()?;
                println!("Configuration saved to {}", path.display());
            }
            Command::Show { latitude, longitude } => {
                let service = ForecastService::from_config(&config)?;
                let text = service
                    .get_forecast(latitude, longitude)
                    .await
                    .with_context(|| format!("Unable to fetch forecast for {latitude}, {longitude}"))?;
                println!("{text}");
            }
            Command::Save { latitude, longitude, dir } => {
                if let Some(dir) = dir {
                    config.data_dir = dir;
                }
                let service = ForecastService::from_config(&config)?;
                let path = service
                    .save_raw_forecast(latitude, longitude)
                    .await
                    .with_context(|| format!("Unable to save forecast for {latitude}, {longitude}"))?;
                println!("{}", path.display());
            }
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    config.provider.base_url = Text::new("Open-Meteo forecast URL:")
        .with_default(&config.provider.base_url)
        .prompt()?;

    let model = Text::new("Forecast model (empty for provider default):")
        .with_default(config.provider.model.as_deref().unwrap_or(""))
        .prompt()?;
    config.provider.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    let data_dir = config.data_dir.display().to_string();
    config.data_dir = Text::new("Directory for saved forecasts:")
        .with_default(&data_dir)
        .prompt()?
        .into();

    config.retry.max_attempts = CustomType::<u32>::new("Maximum attempts:")
        .with_default(config.retry.max_attempts)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    config.retry.initial_delay_ms = CustomType::<u64>::new("Initial retry delay (ms):")
        .with_default(config.retry.initial_delay_ms)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    Ok(())
}
