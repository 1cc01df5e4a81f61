//! Provider abstraction for quote and profile sources.
//!
//! This module defines the [`DataProvider`] trait, the one seam between the
//! dashboard and the outside world. A provider answers two questions for a
//! symbol: "what are its bars over the lookback window" and "what does the
//! upstream know about it in a given [`ProfileCategory`]".
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn DataProvider + Send + Sync`) so the HTTP layer and tests can swap the
//! concrete source at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use quote_fetcher::models::{
//!     bar_series::BarSeries,
//!     interval::Interval,
//!     profile::{Profile, ProfileCategory},
//!     request_params::BarsRequestParams,
//! };
//! use quote_fetcher::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::new(params.symbol, Interval::Daily, vec![]).unwrap())
//!     }
//!
//!     async fn fetch_profile(
//!         &self,
//!         symbol: &str,
//!         category: ProfileCategory,
//!     ) -> Result<Profile, ProviderError> {
//!         Ok(Profile::empty(symbol, category))
//!     }
//! }
//! ```

pub mod yahoo_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{
    bar_series::BarSeries,
    profile::{Profile, ProfileCategory},
    request_params::BarsRequestParams,
};

/// Trait for fetching bars and profile data from a market data provider.
#[async_trait]
pub trait DataProvider {
    /// Fetches the bar history described by `params`.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - Bars in ascending date order, at most one per date.
    /// * `Err(ProviderError)` - If the request fails or the symbol is unknown.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError>;

    /// Fetches one category of profile data for `symbol`.
    async fn fetch_profile(
        &self,
        symbol: &str,
        category: ProfileCategory,
    ) -> Result<Profile, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// User agent contains characters not allowed in a header.
    #[snafu(display("Invalid user agent: {source}"))]
    InvalidUserAgent {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// A configured base URL does not parse.
    #[snafu(display("Invalid base URL: {url}"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },

    /// An override environment variable holds an unparsable value.
    #[snafu(display("Invalid provider setting: {source}"))]
    InvalidEnv {
        source: shared_utils::env::InvalidEnvVarError,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error status or error object.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The upstream knows nothing about the symbol.
    #[snafu(display("No data for symbol {symbol}"))]
    NotFound {
        symbol: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body did not have the expected shape.
    #[snafu(display("Failed to decode provider response: {message}"))]
    Decode {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}
