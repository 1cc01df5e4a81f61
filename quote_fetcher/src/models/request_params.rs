use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::models::interval::Interval;

/// Parameters for requesting a bar history from a market data provider.
///
/// The window is always "the last `lookback_years` years up to now"; the
/// dashboard never asks for an arbitrary range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// Ticker symbol (e.g., `"AAPL"`).
    pub symbol: String,

    /// Bar granularity requested from the provider.
    ///
    /// The dashboard asks for daily bars and regroups locally; providers may
    /// support the coarser intervals directly.
    pub interval: Interval,

    /// Length of the history window in years.
    pub lookback_years: NonZeroU32,

    /// Whether dividend events should be attached to the bars.
    #[serde(default = "default_include_dividends")]
    pub include_dividends: bool,
}

fn default_include_dividends() -> bool {
    true
}

impl BarsRequestParams {
    /// Daily bars with dividends over the given window.
    pub fn daily(symbol: impl Into<String>, lookback_years: NonZeroU32) -> Self {
        Self {
            symbol: symbol.into(),
            interval: Interval::Daily,
            lookback_years,
            include_dividends: true,
        }
    }
}
