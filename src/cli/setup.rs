use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to `config_path`, or to the platform
/// config directory when no path is given.
pub fn setup(config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => setup_at_path(path)?,
        None => setup_at_path(AppConfig::default_config_path()?)?,
    };
    println!(
        "Rates will be quoted against {} from {}",
        config.base_currency,
        config.frankfurter_url()
    );
    Ok(())
}

/// Creates the config file without ever replacing an existing one, then reads
/// it back so a broken template fails here rather than on the next run.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("Configuration file already exists at {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create {}", path.display()));
        }
    };
    file.write_all(EXAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    let config = AppConfig::load_from_path(path)?;
    config.defaults.to_request()?;

    info!(path = %path.display(), "Created default configuration");
    println!("Created default configuration at {}", path.display());
    Ok(config)
}
