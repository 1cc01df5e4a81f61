//! Quote and profile fetching for the research dashboard.
//!
//! [`models`] holds the vendor-agnostic data shapes (bars, series, profiles) and
//! [`providers`] the [`DataProvider`](providers::DataProvider) trait together with
//! the Yahoo Finance REST implementation.

pub mod models;
pub mod providers;
