//! Research page: company card and charts for one symbol.
//!
//! The pure `*_summary` functions turn a [`Profile`] into display strings,
//! substituting the configured placeholder for anything missing. The async
//! functions fetch through a [`DataProvider`] and never fail on upstream
//! errors: a failed profile becomes an empty one (all placeholders) and a
//! failed bar fetch becomes a placeholder chart. Only caller mistakes, such as
//! an empty symbol or an unknown interval tag, are errors.

use chrono::NaiveDate;
use quote_fetcher::{
    models::{
        bar_series::BarSeries,
        interval::{Interval, IntervalError},
        profile::{Profile, ProfileCategory},
        request_params::BarsRequestParams,
    },
    providers::{DataProvider, ProviderError},
};
use serde::Serialize;
use serde_json::Map;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    chart::{ChartOptionError, Figure, PriceChartOptions, dividend_figure, ohlc_chart},
    format::{
        display_value, exchange_label, float_text, format_ipo_date, format_magnitude_value,
        round_to,
    },
    regroup::regroup,
    settings::Settings,
};

type Provider = dyn DataProvider + Send + Sync;

#[derive(Debug, Error, PartialEq)]
pub enum ResearchError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error(transparent)]
    Interval(#[from] IntervalError),
    #[error(transparent)]
    ChartOption(#[from] ChartOptionError),
}

/// General company facts from the `assetProfile` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanySummary {
    pub sector: String,
    pub industry: String,
    pub summary: String,
    pub website: String,
    pub employees: String,
    pub officer_title: String,
    pub officer_name: String,
    pub headquarter: String,
}

/// Price and volume statistics from the `summaryDetail` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSummary {
    pub market_cap: String,
    pub average_volume: String,
    pub previous_volume: String,
    pub previous_close: String,
    pub average_price: String,
    pub low_high: String,
}

/// Listing facts from the `quoteType` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    pub short_name: String,
    pub exchange: String,
    pub ipo_date: String,
}

/// Everything the research card shows for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchCard {
    pub symbol: String,
    pub company: CompanySummary,
    pub price: PriceSummary,
    pub quote: QuoteSummary,
}

/// Trimmed, upper-cased ticker. Blank input is rejected.
pub fn normalize_symbol(raw: &str) -> Result<String, ResearchError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ResearchError::EmptySymbol);
    }
    Ok(symbol)
}

fn text_or(profile: &Profile, key: &str, placeholder: &str) -> String {
    profile
        .get(key)
        .and_then(display_value)
        .unwrap_or_else(|| placeholder.to_string())
}

fn field_or(fields: &Map<String, serde_json::Value>, key: &str, placeholder: &str) -> String {
    fields
        .get(key)
        .and_then(display_value)
        .unwrap_or_else(|| placeholder.to_string())
}

fn magnitude_or(profile: &Profile, key: &str, placeholder: &str) -> String {
    profile
        .get(key)
        .and_then(format_magnitude_value)
        .unwrap_or_else(|| placeholder.to_string())
}

pub fn company_summary(profile: &Profile, placeholder: &str) -> CompanySummary {
    let officers = profile.get_object_list("companyOfficers");
    let empty = Map::new();
    let officer = officers.first().copied().unwrap_or(&empty);

    CompanySummary {
        sector: format!("Sector: {}", text_or(profile, "sector", placeholder)),
        industry: format!("Industry: {}", text_or(profile, "industry", placeholder)),
        summary: text_or(profile, "longBusinessSummary", placeholder),
        website: text_or(profile, "website", placeholder),
        employees: text_or(profile, "fullTimeEmployees", placeholder),
        officer_title: field_or(officer, "title", placeholder),
        officer_name: format!(
            "{} ({})",
            field_or(officer, "name", placeholder),
            field_or(officer, "age", placeholder)
        ),
        headquarter: format!(
            "{}, {}",
            text_or(profile, "city", placeholder),
            text_or(profile, "state", "")
        ),
    }
}

pub fn price_summary(profile: &Profile, placeholder: &str) -> PriceSummary {
    let average_price = profile
        .get_f64("fiftyDayAverage")
        .map(|avg| float_text(round_to(avg, 2)))
        .unwrap_or_else(|| placeholder.to_string());

    PriceSummary {
        market_cap: format!("${}", magnitude_or(profile, "marketCap", placeholder)),
        average_volume: magnitude_or(profile, "averageVolume", placeholder),
        previous_volume: magnitude_or(profile, "volume", placeholder),
        previous_close: format!("${}", text_or(profile, "previousClose", placeholder)),
        average_price: format!("${average_price}"),
        low_high: format!(
            "${}/${}",
            text_or(profile, "fiftyTwoWeekLow", placeholder),
            text_or(profile, "fiftyTwoWeekHigh", placeholder)
        ),
    }
}

pub fn quote_summary(profile: &Profile, placeholder: &str) -> QuoteSummary {
    let exchange = match profile.get_str("exchange") {
        Some(code) => exchange_label(code, placeholder),
        None => placeholder.to_string(),
    };
    let ipo_date = profile
        .get("firstTradeDateEpochUtc")
        .and_then(format_ipo_date)
        .unwrap_or_else(|| placeholder.to_string());

    QuoteSummary {
        short_name: text_or(profile, "shortName", placeholder),
        exchange,
        ipo_date,
    }
}

/// Profile for `symbol`, or an empty one when the upstream fails.
pub async fn load_profile(provider: &Provider, symbol: &str, category: ProfileCategory) -> Profile {
    match provider.fetch_profile(symbol, category).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(symbol, %category, error = %err, "profile unavailable, showing placeholders");
            Profile::empty(symbol, category)
        }
    }
}

/// Fetches the three profile modules and renders the research card.
pub async fn research_card(
    provider: &Provider,
    symbol: &str,
    settings: &Settings,
) -> Result<ResearchCard, ResearchError> {
    let symbol = normalize_symbol(symbol)?;
    let asset = load_profile(provider, &symbol, ProfileCategory::AssetProfile).await;
    let detail = load_profile(provider, &symbol, ProfileCategory::SummaryDetail).await;
    let quote = load_profile(provider, &symbol, ProfileCategory::QuoteType).await;
    let placeholder = settings.placeholder.as_str();
    Ok(ResearchCard {
        company: company_summary(&asset, placeholder),
        price: price_summary(&detail, placeholder),
        quote: quote_summary(&quote, placeholder),
        symbol,
    })
}

/// Daily history over the configured lookback window, dividends included.
pub async fn fetch_history(
    provider: &Provider,
    symbol: &str,
    settings: &Settings,
) -> Result<BarSeries, ProviderError> {
    let params = BarsRequestParams::daily(symbol, settings.lookback_years);
    let series = provider.fetch_bars(params).await?;
    info!(symbol, bars = series.len(), "loaded history");
    Ok(series)
}

fn unavailable(symbol: &str) -> Figure {
    Figure::placeholder(format!("Data unavailable for {symbol}"))
}

/// Price chart for `symbol`, regrouped to the interval named by `interval_tag`.
pub async fn price_figure(
    provider: &Provider,
    symbol: &str,
    interval_tag: &str,
    opts: &PriceChartOptions,
    settings: &Settings,
) -> Result<Figure, ResearchError> {
    let symbol = normalize_symbol(symbol)?;
    let interval: Interval = interval_tag.parse()?;
    let daily = match fetch_history(provider, &symbol, settings).await {
        Ok(series) => series,
        Err(err) => {
            warn!(symbol, error = %err, "price history unavailable");
            return Ok(unavailable(&symbol));
        }
    };
    let series = regroup(&daily, interval);
    Ok(ohlc_chart(&symbol, &series, opts, &settings.theme))
}

/// Dividend chart for `symbol`; `today` decides whether the running fiscal year is shown.
pub async fn dividend_figure_for(
    provider: &Provider,
    symbol: &str,
    settings: &Settings,
    today: NaiveDate,
) -> Result<Figure, ResearchError> {
    let symbol = normalize_symbol(symbol)?;
    match fetch_history(provider, &symbol, settings).await {
        Ok(series) => Ok(dividend_figure(&series.bars, today, &settings.theme)),
        Err(err) => {
            warn!(symbol, error = %err, "dividend history unavailable");
            Ok(unavailable(&symbol))
        }
    }
}
