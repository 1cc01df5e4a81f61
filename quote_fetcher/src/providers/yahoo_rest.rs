//! Yahoo Finance REST provider.
//!
//! Two public endpoints are used: the v8 chart endpoint for bars and dividend
//! events, and the v10 quote-summary endpoint for profile modules. Neither
//! needs an API key; a browser-like `User-Agent` is sent with every request.

pub mod params;
pub mod provider;
pub mod response;

use serde::{Deserialize, Serialize};
use shared_utils::env::{get_env_var_opt, parse_env_var};
use snafu::ResultExt;

pub use provider::YahooProvider;

use crate::providers::{InvalidEnvSnafu, ProviderInitError};

pub const DEFAULT_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_SUMMARY_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) alphadash/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for [`YahooProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YahooConfig {
    /// Scheme and host of the chart endpoint.
    pub chart_base_url: String,
    /// Scheme and host of the quote-summary endpoint.
    pub summary_base_url: String,
    pub user_agent: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_base_url: DEFAULT_CHART_BASE_URL.to_string(),
            summary_base_url: DEFAULT_SUMMARY_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl YahooConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ProviderInitError> {
        Self::default().with_env_overrides()
    }

    /// Applies the optional overrides
    /// `ALPHADASH_YAHOO_CHART_URL`, `ALPHADASH_YAHOO_SUMMARY_URL`,
    /// `ALPHADASH_USER_AGENT` and `ALPHADASH_HTTP_TIMEOUT_SECS`.
    pub fn with_env_overrides(mut self) -> Result<Self, ProviderInitError> {
        if let Some(url) = get_env_var_opt("ALPHADASH_YAHOO_CHART_URL") {
            self.chart_base_url = url;
        }
        if let Some(url) = get_env_var_opt("ALPHADASH_YAHOO_SUMMARY_URL") {
            self.summary_base_url = url;
        }
        if let Some(agent) = get_env_var_opt("ALPHADASH_USER_AGENT") {
            self.user_agent = agent;
        }
        if let Some(secs) =
            parse_env_var::<u64>("ALPHADASH_HTTP_TIMEOUT_SECS").context(InvalidEnvSnafu)?
        {
            self.timeout_secs = secs;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn env_overrides_replace_defaults() {
        unsafe {
            std::env::set_var("ALPHADASH_YAHOO_CHART_URL", "http://127.0.0.1:9999");
            std::env::set_var("ALPHADASH_HTTP_TIMEOUT_SECS", "3");
        }
        let cfg = YahooConfig::from_env().unwrap();
        unsafe {
            std::env::remove_var("ALPHADASH_YAHOO_CHART_URL");
            std::env::remove_var("ALPHADASH_HTTP_TIMEOUT_SECS");
        }
        assert_eq!(cfg.chart_base_url, "http://127.0.0.1:9999");
        assert_eq!(cfg.summary_base_url, DEFAULT_SUMMARY_BASE_URL);
        assert_eq!(cfg.timeout_secs, 3);
    }

    #[test]
    #[serial]
    fn bad_timeout_is_an_init_error() {
        unsafe { std::env::set_var("ALPHADASH_HTTP_TIMEOUT_SECS", "soon") };
        let err = YahooConfig::from_env().unwrap_err();
        unsafe { std::env::remove_var("ALPHADASH_HTTP_TIMEOUT_SECS") };
        assert!(matches!(err, ProviderInitError::InvalidEnv { .. }));
    }
}
