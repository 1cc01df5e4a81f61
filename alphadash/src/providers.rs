//! Provider registry that maps a [`ProviderId`] from the settings to a concrete provider.
use std::sync::Arc;

use quote_fetcher::providers::{DataProvider, ProviderInitError, yahoo_rest::YahooProvider};
use serde::{Deserialize, Serialize};

use crate::settings::ProviderSettings;

/// Shared handle the research handlers fetch through.
pub type SharedProvider = Arc<dyn DataProvider + Send + Sync>;

/// Which upstream to use (serde snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Yahoo Finance public chart and quote-summary endpoints.
    #[default]
    Yahoo,
}

/// Build the provider named by `settings.id`, applying its environment overrides.
pub fn build_provider(settings: &ProviderSettings) -> Result<SharedProvider, ProviderInitError> {
    match settings.id {
        ProviderId::Yahoo => {
            let config = settings.yahoo.clone().with_env_overrides()?;
            let p = YahooProvider::new(&config)?;
            Ok(Arc::new(p))
        }
    }
}
