//! Wire shapes of the Yahoo endpoints and their conversion to canonical models.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    models::{
        bar::Bar,
        bar_series::BarSeries,
        profile::{Profile, ProfileCategory},
        request_params::BarsRequestParams,
    },
    providers::{ApiSnafu, DecodeSnafu, NotFoundSnafu, ProviderError},
};

/// Error object both endpoints embed next to (or instead of) `result`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct YahooError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl YahooError {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }

    /// Converts the upstream error into a provider error for `symbol`.
    pub fn into_provider_error(self, symbol: &str) -> ProviderError {
        if self.is_not_found() {
            NotFoundSnafu { symbol }.build()
        } else {
            ApiSnafu {
                message: format!("{}: {}", self.code, self.description),
            }
            .build()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub events: Option<ChartEvents>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "exchangeTimezoneName")]
    pub exchange_timezone_name: Option<String>,
    #[serde(rename = "gmtoffset")]
    pub gmt_offset: Option<i32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChartEvents {
    #[serde(default)]
    pub dividends: IndexMap<String, DividendEvent>,
}

#[derive(Deserialize, Debug)]
pub struct DividendEvent {
    pub amount: f64,
    pub date: i64,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

/// Column-oriented OHLCV arrays; any cell may be `null`.
#[derive(Deserialize, Debug, Default)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
pub struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: SummaryBody,
}

#[derive(Deserialize, Debug)]
pub struct SummaryBody {
    pub result: Option<Vec<IndexMap<String, Value>>>,
    pub error: Option<YahooError>,
}

/// Maps epoch seconds to the trading date at the exchange.
#[derive(Debug, Clone, Copy)]
enum ExchangeClock {
    Zone(Tz),
    Fixed(FixedOffset),
}

impl ExchangeClock {
    fn from_meta(meta: &ChartMeta) -> Self {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return ExchangeClock::Zone(tz);
        }
        let offset = meta
            .gmt_offset
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        ExchangeClock::Fixed(offset)
    }

    fn date_of(&self, epoch_secs: i64) -> Option<NaiveDate> {
        let utc = DateTime::from_timestamp(epoch_secs, 0)?;
        Some(match self {
            ExchangeClock::Zone(tz) => utc.with_timezone(tz).date_naive(),
            ExchangeClock::Fixed(offset) => utc.with_timezone(offset).date_naive(),
        })
    }
}

/// Extracts the upstream error object from an arbitrary error body, if any.
pub fn upstream_error(body: &str) -> Option<YahooError> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .as_object()?
        .values()
        .filter_map(|section| section.get("error"))
        .find(|error| !error.is_null())
        .and_then(|error| serde_json::from_value(error.clone()).ok())
}

/// Converts a chart response into a [`BarSeries`].
///
/// Rows with any missing price are skipped. When two rows fall on the same
/// exchange date the later one wins (the endpoint appends the live session as
/// an extra row). Dividend events are attached to the bar of their date.
pub fn into_bar_series(
    envelope: ChartEnvelope,
    params: &BarsRequestParams,
) -> Result<BarSeries, ProviderError> {
    let ChartBody { result, error } = envelope.chart;
    if let Some(error) = error {
        return Err(error.into_provider_error(&params.symbol));
    }
    let Some(result) = result.and_then(|results| results.into_iter().next()) else {
        return NotFoundSnafu {
            symbol: params.symbol.as_str(),
        }
        .fail();
    };

    let clock = ExchangeClock::from_meta(&result.meta);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            cell(&quote.open, i),
            cell(&quote.high, i),
            cell(&quote.low, i),
            cell(&quote.close, i),
        ) else {
            debug!(symbol = %params.symbol, ts, "skipping row with missing prices");
            continue;
        };
        let Some(date) = clock.date_of(ts) else {
            continue;
        };
        let volume = cell(&quote.volume, i).map_or(0, |v| v.max(0.0).round() as u64);
        by_date.insert(date, Bar::new(date, open, high, low, close, volume));
    }

    if params.include_dividends {
        for event in result.events.unwrap_or_default().dividends.into_values() {
            let bar = clock
                .date_of(event.date)
                .and_then(|date| by_date.get_mut(&date));
            match bar {
                Some(bar) => bar.dividend += event.amount,
                None => debug!(symbol = %params.symbol, date = event.date, "dividend without a matching bar"),
            }
        }
    }

    let symbol = if result.meta.symbol.is_empty() {
        params.symbol.clone()
    } else {
        result.meta.symbol
    };
    BarSeries::new(symbol, params.interval, by_date.into_values().collect()).map_err(|e| {
        DecodeSnafu {
            message: e.to_string(),
        }
        .build()
    })
}

fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Converts a quote-summary response into a [`Profile`] for one category.
///
/// A result that lacks the requested module yields an empty profile: the
/// symbol exists, the upstream just has nothing in that category.
pub fn into_profile(
    envelope: SummaryEnvelope,
    symbol: &str,
    category: ProfileCategory,
) -> Result<Profile, ProviderError> {
    let SummaryBody { result, error } = envelope.quote_summary;
    if let Some(error) = error {
        return Err(error.into_provider_error(symbol));
    }
    let Some(mut modules) = result.and_then(|results| results.into_iter().next()) else {
        return NotFoundSnafu { symbol }.fail();
    };

    let fields = match modules.shift_remove(category.module_name()).map(flatten_raw) {
        Some(Value::Object(map)) => map.into_iter().collect(),
        Some(Value::Null) | None => IndexMap::new(),
        Some(other) => {
            return DecodeSnafu {
                message: format!(
                    "module {} is not an object: {other}",
                    category.module_name()
                ),
            }
            .fail();
        }
    };
    Ok(Profile::new(symbol, category, fields))
}

/// Replaces `{"raw": .., "fmt": ..}` wrappers by their raw value, recursively.
///
/// Empty objects, which the endpoint uses for "no value", become `null`.
pub fn flatten_raw(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            if map.is_empty() {
                return Value::Null;
            }
            let is_wrapper = map.contains_key("raw")
                && map.keys().all(|k| matches!(k.as_str(), "raw" | "fmt" | "longFmt"));
            if is_wrapper {
                return map.remove("raw").unwrap_or(Value::Null);
            }
            Value::Object(map.into_iter().map(|(k, v)| (k, flatten_raw(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(flatten_raw).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use serde_json::json;

    use super::*;

    fn params() -> BarsRequestParams {
        BarsRequestParams::daily("AAPL", NonZeroU32::new(10).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-02-08 and 2024-02-09 14:30Z (09:30 New York), plus a null row.
    fn chart_json() -> Value {
        json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "AAPL",
                        "exchangeTimezoneName": "America/New_York",
                        "gmtoffset": -18000
                    },
                    "timestamp": [1707402600, 1707489000, 1707748200],
                    "events": {
                        "dividends": {
                            "1707489000": { "amount": 0.24, "date": 1707489000 }
                        }
                    },
                    "indicators": {
                        "quote": [{
                            "open":   [189.38, 188.65, null],
                            "high":   [189.54, 189.99, null],
                            "low":    [187.35, 188.0, null],
                            "close":  [188.32, 188.85, null],
                            "volume": [40962000, 45155200, null]
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn converts_rows_to_exchange_dates() {
        let envelope: ChartEnvelope = serde_json::from_value(chart_json()).unwrap();
        let series = into_bar_series(envelope, &params()).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date, date(2024, 2, 8));
        assert_eq!(series.bars[1].date, date(2024, 2, 9));
        assert_eq!(series.bars[0].volume, 40_962_000);
        assert_eq!(series.bars[1].close, 188.85);
    }

    #[test]
    fn attaches_dividends_to_matching_bar() {
        let envelope: ChartEnvelope = serde_json::from_value(chart_json()).unwrap();
        let series = into_bar_series(envelope, &params()).unwrap();
        assert_eq!(series.bars[0].dividend, 0.0);
        assert_eq!(series.bars[1].dividend, 0.24);
    }

    #[test]
    fn dividends_ignored_when_not_requested() {
        let envelope: ChartEnvelope = serde_json::from_value(chart_json()).unwrap();
        let mut p = params();
        p.include_dividends = false;
        let series = into_bar_series(envelope, &p).unwrap();
        assert!(series.dividend_bars().is_empty());
    }

    #[test]
    fn later_row_wins_on_same_date() {
        let mut raw = chart_json();
        // a second row on 2024-02-09, at 20:00Z (15:00 New York)
        raw["chart"]["result"][0]["timestamp"] = json!([1707402600, 1707489000, 1707508800]);
        raw["chart"]["result"][0]["indicators"]["quote"][0]["close"] = json!([188.32, 188.85, 190.0]);
        raw["chart"]["result"][0]["indicators"]["quote"][0]["open"] = json!([189.38, 188.65, 188.7]);
        raw["chart"]["result"][0]["indicators"]["quote"][0]["high"] = json!([189.54, 189.99, 190.2]);
        raw["chart"]["result"][0]["indicators"]["quote"][0]["low"] = json!([187.35, 188.0, 188.1]);
        let envelope: ChartEnvelope = serde_json::from_value(raw).unwrap();
        let series = into_bar_series(envelope, &params()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[1].close, 190.0);
    }

    #[test]
    fn falls_back_to_fixed_offset() {
        let mut raw = chart_json();
        raw["chart"]["result"][0]["meta"]["exchangeTimezoneName"] = json!("Not/AZone");
        // 1707402600 is 2024-02-08T14:30Z; at +10:00 it is already the 9th.
        raw["chart"]["result"][0]["meta"]["gmtoffset"] = json!(36000);
        let envelope: ChartEnvelope = serde_json::from_value(raw).unwrap();
        let series = into_bar_series(envelope, &params()).unwrap();
        assert_eq!(series.bars[0].date, date(2024, 2, 9));
    }

    #[test]
    fn error_object_maps_to_not_found() {
        let envelope: ChartEnvelope = serde_json::from_value(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }))
        .unwrap();
        let err = into_bar_series(envelope, &params()).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound { .. }));
    }

    #[test]
    fn empty_result_is_not_found() {
        let envelope: ChartEnvelope =
            serde_json::from_value(json!({ "chart": { "result": [], "error": null } })).unwrap();
        assert!(matches!(
            into_bar_series(envelope, &params()),
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[test]
    fn upstream_error_from_any_section() {
        let body = r#"{"quoteSummary":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#;
        let err = upstream_error(body).unwrap();
        assert_eq!(err.code, "Unauthorized");
        assert!(!err.is_not_found());
        assert_eq!(upstream_error("<html>oops</html>"), None);
    }

    #[test]
    fn flattens_raw_wrappers() {
        let flat = flatten_raw(json!({
            "marketCap": { "raw": 2_900_000_000_000u64, "fmt": "2.9T", "longFmt": "2,900,000,000,000" },
            "dividendRate": {},
            "companyOfficers": [{ "name": "Tim", "totalPay": { "raw": 16425933, "fmt": "16.43M" } }],
            "city": "Cupertino"
        }));
        assert_eq!(flat["marketCap"], json!(2_900_000_000_000u64));
        assert_eq!(flat["dividendRate"], Value::Null);
        assert_eq!(flat["companyOfficers"][0]["totalPay"], json!(16425933));
        assert_eq!(flat["city"], json!("Cupertino"));
    }

    #[test]
    fn profile_from_module() {
        let envelope: SummaryEnvelope = serde_json::from_value(json!({
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {
                        "previousClose": { "raw": 188.85, "fmt": "188.85" },
                        "volume": { "raw": 45155200, "fmt": "45.16M" }
                    }
                }],
                "error": null
            }
        }))
        .unwrap();
        let profile = into_profile(envelope, "AAPL", ProfileCategory::SummaryDetail).unwrap();
        assert_eq!(profile.get_f64("previousClose"), Some(188.85));
        assert_eq!(profile.get_f64("volume"), Some(45155200.0));
    }

    #[test]
    fn missing_module_gives_empty_profile() {
        let envelope: SummaryEnvelope = serde_json::from_value(json!({
            "quoteSummary": { "result": [{ "quoteType": { "exchange": "NMS" } }], "error": null }
        }))
        .unwrap();
        let profile = into_profile(envelope, "AAPL", ProfileCategory::AssetProfile).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.category, ProfileCategory::AssetProfile);
    }
}
