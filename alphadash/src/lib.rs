//! Stock research dashboard: data shaping behind the research and backtest pages.
//!
//! - [`settings`]: the one immutable configuration value
//! - [`regroup`]: daily to weekly/monthly bars
//! - [`format`]: magnitude, exchange and date labels
//! - [`dividend`]: yield per fiscal year
//! - [`chart`]: Plotly figure builders
//! - [`research`], [`backtest`]: page callbacks as plain functions
//! - [`server`]: HTTP API, [`logging`]: tracing setup

pub mod backtest;
pub mod chart;
pub mod dividend;
pub mod format;
pub mod logging;
pub mod providers;
pub mod regroup;
pub mod research;
pub mod server;
pub mod settings;
