//! Canonical in-memory representation of one trading-interval record (OHLCV).
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! implementation and the input of the regrouper and chart builders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar for one calendar date.
///
/// The date is the exchange-local trading date, not a UTC instant. Weekly and
/// monthly bars are dated at the end of their bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date of the bar (or bucket end after regrouping).
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the bar interval.
    pub volume: u64,

    /// Cash dividend per share going ex on this date, `0.0` when none.
    #[serde(default)]
    pub dividend: f64,
}

impl Bar {
    /// Creates a bar without a dividend.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            dividend: 0.0,
        }
    }

    /// Sets the dividend amount.
    pub fn with_dividend(mut self, dividend: f64) -> Self {
        self.dividend = dividend;
        self
    }

    pub fn pays_dividend(&self) -> bool {
        self.dividend != 0.0
    }
}
