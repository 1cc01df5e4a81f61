//! A collection of bars for a specific symbol and interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{bar::Bar, interval::Interval};

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bars for {symbol} are not strictly increasing by date at index {index}")]
    Unordered { symbol: String, index: usize },
}

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`Interval`], making the data set self-describing. Dates are strictly
/// increasing; a series is never patched in place, a symbol change fetches a
/// new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL").
    pub symbol: String,
    /// The interval each bar covers.
    pub interval: Interval,
    /// The collection of OHLCV bars, ascending by date.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, checking that dates are strictly increasing.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[0].date >= pair[1].date)
        {
            return Err(SeriesError::Unordered {
                symbol,
                index: index + 1,
            });
        }
        Ok(Self {
            symbol,
            interval,
            bars,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Bars on which a dividend went ex, in date order.
    pub fn dividend_bars(&self) -> Vec<Bar> {
        self.bars
            .iter()
            .filter(|bar| bar.pays_dividend())
            .cloned()
            .collect()
    }
}
