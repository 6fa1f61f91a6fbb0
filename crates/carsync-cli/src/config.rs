//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use carsync_core::DEFAULT_REFRESH_INTERVAL;

use crate::cli::{ConfigKey, parse_bool_arg};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL of the telemetry service.
    /// Default: "http://localhost:3001"
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Auto-refresh interval in seconds for `watch`
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Default license plate
    #[serde(default)]
    pub plate: Option<String>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,
}

fn default_service_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            refresh_interval: default_refresh_interval(),
            plate: None,
            no_color: false,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carsync")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a specific file, warning and falling back to
    /// defaults when it cannot be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Current value of a key, `None` when unset.
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::ServiceUrl => Some(self.service_url.clone()),
            ConfigKey::RefreshInterval => Some(self.refresh_interval.to_string()),
            ConfigKey::Plate => self.plate.clone(),
            ConfigKey::NoColor => Some(self.no_color.to_string()),
        }
    }

    /// Validate and store a value.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::ServiceUrl => {
                let url = value.trim().trim_end_matches('/');
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    bail!("URL must start with http:// or https://, got: {}", value);
                }
                self.service_url = url.to_string();
            }
            ConfigKey::RefreshInterval => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("'{}' is not a valid number", value))?;
                if secs == 0 {
                    bail!("refresh_interval must be at least 1 second");
                }
                self.refresh_interval = secs;
            }
            ConfigKey::Plate => {
                let plate = carsync_types::validate_plate(value)
                    .map_err(|e| anyhow::anyhow!("Invalid plate: {}", e))?;
                self.plate = Some(plate.to_string());
            }
            ConfigKey::NoColor => {
                self.no_color = parse_bool_arg(value).map_err(anyhow::Error::msg)?;
            }
        }
        Ok(())
    }

    /// Reset a key to its default.
    pub fn unset(&mut self, key: ConfigKey) {
        let defaults = Self::default();
        match key {
            ConfigKey::ServiceUrl => self.service_url = defaults.service_url,
            ConfigKey::RefreshInterval => self.refresh_interval = defaults.refresh_interval,
            ConfigKey::Plate => self.plate = None,
            ConfigKey::NoColor => self.no_color = defaults.no_color,
        }
    }
}

/// Resolve the plate from the argument (which already includes
/// `CARSYNC_PLATE`) or the configured default.
pub fn resolve_plate(plate: Option<String>, config: &Config) -> Option<String> {
    plate.or_else(|| config.plate.clone())
}

/// Resolve the service URL from the argument (which already includes
/// `CARSYNC_URL`) or the config file.
pub fn resolve_url(url: Option<String>, config: &Config) -> String {
    url.unwrap_or_else(|| config.service_url.clone())
}
