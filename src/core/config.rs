use crate::core::currency::CurrencyCode;
use crate::core::error::DashboardError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Shape of the historical series endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStyle {
    /// `{base_url}/{start}..{end}?base=USD&symbols=TRY`
    #[default]
    BaseSymbols,
    /// `{base_url}/{start}..{end}?from=USD&to=TRY`
    FromTo,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    #[serde(default)]
    pub style: EndpointStyle,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterConfig {
    /// Tried in order. The first one also serves latest rates and the
    /// currency list.
    pub endpoints: Vec<EndpointConfig>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for FrankfurterConfig {
    fn default() -> Self {
        FrankfurterConfig {
            endpoints: vec![
                EndpointConfig {
                    base_url: "https://api.frankfurter.dev/v1".to_string(),
                    style: EndpointStyle::BaseSymbols,
                },
                EndpointConfig {
                    base_url: "https://api.frankfurter.app".to_string(),
                    style: EndpointStyle::FromTo,
                },
            ],
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub frankfurter: FrankfurterConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_sparkline_width")]
    pub sparkline_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            locale: Locale::default(),
            sparkline_width: default_sparkline_width(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_quote_currency")]
    pub quote_currency: CurrencyCode,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<CurrencyCode>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            quote_currency: default_quote_currency(),
            currencies: default_currencies(),
            refresh_interval_secs: default_refresh_interval_secs(),
            providers: ProvidersConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

fn default_quote_currency() -> CurrencyCode {
    CurrencyCode::lira()
}

fn default_currencies() -> Vec<CurrencyCode> {
    ["USD", "EUR"]
        .iter()
        .filter_map(|c| c.parse().ok())
        .collect()
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_sparkline_width() -> usize {
    24
}

impl AppConfig {
    /// Loads the config from the default location, or the built-in defaults
    /// when no file has been created yet.
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
        let proj_dirs = ProjectDirs::from("dev", "fxtry", "fxtry")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.providers.frankfurter.endpoints.is_empty() {
            anyhow::bail!("At least one Frankfurter endpoint must be configured");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than zero");
        }
        if self.currencies.contains(&self.quote_currency) {
            return Err(
                DashboardError::QuoteCurrencySelected(self.quote_currency.to_string()).into(),
            );
        }
        Ok(())
    }
}
