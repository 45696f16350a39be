use crate::core::convert::{Amount, ConversionRequest};
use crate::core::rates::DEFAULT_BASE_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FRANKFURTER_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig {
                base_url: DEFAULT_FRANKFURTER_URL.to_string(),
            }),
        }
    }
}

/// Initial selection shown when a session starts.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ConversionDefaults {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl Default for ConversionDefaults {
    fn default() -> Self {
        ConversionDefaults {
            amount: 1.0,
            from: DEFAULT_BASE_CURRENCY.to_string(),
            to: "INR".to_string(),
        }
    }
}

impl ConversionDefaults {
    pub fn to_request(&self) -> Result<ConversionRequest> {
        let amount = Amount::new(self.amount).context("Invalid default amount in config")?;
        Ok(ConversionRequest::new(
            amount,
            &self.from.to_uppercase(),
            &self.to.to_uppercase(),
        ))
    }
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub defaults: ConversionDefaults,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            defaults: ConversionDefaults::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults when
    /// no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn frankfurter_url(&self) -> &str {
        self.providers
            .frankfurter
            .as_ref()
            .map_or(DEFAULT_FRANKFURTER_URL, |p| &p.base_url)
    }
}
