//! Dashboard settings: parsing, validation, and loading.
//!
//! One immutable [`Settings`] value is built at startup and passed explicitly
//! to everything that needs the lookback window, the placeholder string, or the
//! theme. Nothing reads settings from a global.
//!
//! Sources, later ones winning:
//! - built-in defaults ([`Settings::default`])
//! - a TOML file or string ([`load_settings_path`], [`load_settings_str`]);
//!   missing keys keep their default, unknown keys are rejected
//! - environment overrides ([`Settings::with_env_overrides`]):
//!   `ALPHADASH_LOOKBACK_YEARS`, `ALPHADASH_ADDR`
//!
//! ```
//! use alphadash::settings::load_settings_str;
//!
//! let settings = load_settings_str("lookback_years = 5\nplaceholder = \"n/a\"").unwrap();
//! assert_eq!(settings.lookback_years.get(), 5);
//! assert_eq!(settings.placeholder, "n/a");
//! assert_eq!(settings.theme.font, "Droid Sans");
//! ```

use std::{
    net::{Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use quote_fetcher::providers::yahoo_rest::YahooConfig;
use serde::{Deserialize, Serialize};
use shared_utils::env::{InvalidEnvVarError, parse_env_var};
use thiserror::Error;

use crate::providers::ProviderId;

/// Longest lookback the date pickers accept.
pub const MAX_LOOKBACK_YEARS: u32 = 100;

pub const DEFAULT_LOOKBACK_YEARS: NonZeroU32 = match NonZeroU32::new(10) {
    Some(nz) => nz,
    None => unreachable!(),
};

pub const DEFAULT_PORT: u16 = 8888;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error(transparent)]
    Env(#[from] InvalidEnvVarError),
}

/// Everything the dashboard needs to know at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Years of daily history fetched per symbol; also bounds the backtest date pickers.
    pub lookback_years: NonZeroU32,
    /// Shown wherever a profile field or exchange code is unavailable.
    pub placeholder: String,
    pub provider: ProviderSettings,
    pub server: ServerSettings,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            placeholder: "-".to_string(),
            provider: ProviderSettings::default(),
            server: ServerSettings::default(),
            theme: Theme::default(),
        }
    }
}

/// Which upstream serves quotes and profiles, and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    pub id: ProviderId,
    pub yahoo: YahooConfig,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            id: ProviderId::Yahoo,
            yahoo: YahooConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Listen address of the HTTP API.
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}

/// Fonts and colours shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub font: String,
    pub ocean_blue: String,
    pub dollar_green: String,
    /// Plot area background of the price and dividend charts.
    pub plot_background: String,
    pub colors: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font: "Droid Sans".to_string(),
            ocean_blue: "#0077BE".to_string(),
            dollar_green: "#85bb65".to_string(),
            plot_background: "rgba(236, 239, 241, 0.7)".to_string(),
            colors: Palette::default(),
        }
    }
}

/// Bootstrap-style named colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub success: String,
    pub info: String,
    pub warning: String,
    pub danger: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#4582ec".to_string(),
            secondary: "#02b875".to_string(),
            success: "#02b875".to_string(),
            info: "#17a2b8".to_string(),
            warning: "#f0ad4e".to_string(),
            danger: "#d9534f".to_string(),
        }
    }
}

impl Settings {
    /// Rejects values the rest of the dashboard cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.placeholder.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "placeholder cannot be empty".to_string(),
            ));
        }
        if self.lookback_years.get() > MAX_LOOKBACK_YEARS {
            return Err(SettingsError::Invalid(format!(
                "lookback_years must be at most {MAX_LOOKBACK_YEARS}, got {}",
                self.lookback_years
            )));
        }
        if self.theme.font.trim().is_empty() {
            return Err(SettingsError::Invalid("theme.font cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Applies `ALPHADASH_LOOKBACK_YEARS` and `ALPHADASH_ADDR` when set.
    pub fn with_env_overrides(mut self) -> Result<Self, SettingsError> {
        if let Some(years) = parse_env_var::<NonZeroU32>("ALPHADASH_LOOKBACK_YEARS")? {
            self.lookback_years = years;
        }
        if let Some(addr) = parse_env_var::<SocketAddr>("ALPHADASH_ADDR")? {
            self.server.addr = addr;
        }
        Ok(self)
    }
}

/// Parse and validate settings from a TOML string.
pub fn load_settings_str(s: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = toml::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

/// Read, parse and validate settings from a TOML file.
pub fn load_settings_path<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_settings_str(&s)
}

/// Settings for the binary: the file when one is given, else defaults, then env overrides.
pub fn resolve_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let settings = match path {
        Some(path) => load_settings_path(path)?,
        None => Settings::default(),
    };
    let settings = settings.with_env_overrides()?;
    settings.validate()?;
    Ok(settings)
}
