use std::num::NonZeroU32;

use snafu::ensure;

use crate::{
    models::{interval::Interval, profile::ProfileCategory, request_params::BarsRequestParams},
    providers::{ProviderError, ValidationSnafu},
};

/// Maps an [`Interval`] to the chart endpoint's `interval` value.
pub fn interval_param(interval: Interval) -> &'static str {
    match interval {
        Interval::Daily => "1d",
        Interval::Weekly => "1wk",
        Interval::Monthly => "1mo",
    }
}

/// Lookback window as a chart `range` value, e.g. `"10y"`.
pub fn range_param(lookback_years: NonZeroU32) -> String {
    format!("{}y", lookback_years.get())
}

/// Rejects symbols that cannot be a single URL path segment.
pub fn validate_symbol(symbol: &str) -> Result<(), ProviderError> {
    ensure!(
        !symbol.is_empty(),
        ValidationSnafu {
            message: "symbol must not be empty"
        }
    );
    ensure!(
        !symbol.chars().any(|c| c.is_whitespace() || c == '/'),
        ValidationSnafu {
            message: format!("symbol {symbol:?} contains whitespace or '/'")
        }
    );
    Ok(())
}

/// Query string for the chart endpoint.
pub fn chart_query(params: &BarsRequestParams) -> Vec<(String, String)> {
    let mut query = vec![
        ("range".to_string(), range_param(params.lookback_years)),
        (
            "interval".to_string(),
            interval_param(params.interval).to_string(),
        ),
        ("includePrePost".to_string(), "false".to_string()),
    ];
    if params.include_dividends {
        query.push(("events".to_string(), "div".to_string()));
    }
    query
}

/// Query string for the quote-summary endpoint.
pub fn summary_query(category: ProfileCategory) -> Vec<(String, String)> {
    vec![("modules".to_string(), category.module_name().to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_query_for_daily_history() {
        let params = BarsRequestParams::daily("AAPL", NonZeroU32::new(10).unwrap());
        let query = chart_query(&params);
        assert!(query.contains(&("range".into(), "10y".into())));
        assert!(query.contains(&("interval".into(), "1d".into())));
        assert!(query.contains(&("events".into(), "div".into())));
    }

    #[test]
    fn chart_query_without_dividends() {
        let mut params = BarsRequestParams::daily("AAPL", NonZeroU32::new(2).unwrap());
        params.include_dividends = false;
        params.interval = Interval::Monthly;
        let query = chart_query(&params);
        assert!(query.contains(&("interval".into(), "1mo".into())));
        assert!(!query.iter().any(|(k, _)| k == "events"));
    }

    #[test]
    fn symbol_validation() {
        assert!(validate_symbol("AAPL").is_ok());
        assert!(validate_symbol("^GSPC").is_ok());
        assert!(validate_symbol("BRK-B").is_ok());
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("AA PL").is_err());
        assert!(validate_symbol("../x").is_err());
    }

    #[test]
    fn summary_query_names_module() {
        assert_eq!(
            summary_query(ProfileCategory::SummaryDetail),
            vec![("modules".to_string(), "summaryDetail".to_string())]
        );
    }
}
