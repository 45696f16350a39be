pub mod cli;
pub mod core;
pub mod providers;

pub use crate::cli::convert::ConvertOptions;
pub use crate::core::config;

use crate::providers::frankfurter::FrankfurterProvider;
use anyhow::Result;
use std::io::Write;
use tracing::{debug, info};

pub enum AppCommand {
    Convert(ConvertOptions),
    Rates,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_to(command, config_path, &mut std::io::stdout()).await
}

/// Runs `command`, writing everything it displays to `output`.
pub async fn run_command_to<W: Write>(
    command: AppCommand,
    config_path: Option<&str>,
    output: &mut W,
) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let base_currency = config.base_currency.to_uppercase();
    let defaults = config.defaults.to_request()?;
    let rate_provider = FrankfurterProvider::new(config.frankfurter_url());

    match command {
        AppCommand::Convert(options) => {
            cli::convert::run(&rate_provider, &base_currency, defaults, &options, output).await
        }
        AppCommand::Rates => cli::rates::run(&rate_provider, &base_currency, output).await,
        AppCommand::Interactive => {
            cli::interactive::run(&rate_provider, &base_currency, defaults, output).await
        }
    }
}
