use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use snafu::{OptionExt, ResultExt};
use tracing::{debug, info};

use crate::{
    models::{
        bar_series::BarSeries,
        profile::{Profile, ProfileCategory},
        request_params::BarsRequestParams,
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DecodeSnafu, InvalidBaseUrlSnafu,
        InvalidUserAgentSnafu, NotFoundSnafu, ProviderError, ProviderInitError, ReqwestSnafu,
        ValidationSnafu,
        yahoo_rest::{
            YahooConfig,
            params::{chart_query, summary_query, validate_symbol},
            response::{ChartEnvelope, SummaryEnvelope, into_bar_series, into_profile, upstream_error},
        },
    },
};

const CHART_PATH: [&str; 3] = ["v8", "finance", "chart"];
const SUMMARY_PATH: [&str; 3] = ["v10", "finance", "quoteSummary"];

/// Error bodies are echoed into messages; keep them short.
const MAX_ERROR_BODY: usize = 200;

pub struct YahooProvider {
    client: Client,
    chart_base: Url,
    summary_base: Url,
}

impl YahooProvider {
    /// Creates a provider from explicit settings.
    pub fn new(config: &YahooConfig) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent).context(InvalidUserAgentSnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            chart_base: parse_base(&config.chart_base_url)?,
            summary_base: parse_base(&config.summary_base_url)?,
        })
    }

    /// Creates a provider from defaults plus `ALPHADASH_*` environment overrides.
    pub fn from_env() -> Result<Self, ProviderInitError> {
        Self::new(&YahooConfig::from_env()?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(String, String)],
        symbol: &str,
    ) -> Result<T, ProviderError> {
        debug!(%url, symbol, "requesting");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;
        if !status.is_success() {
            return Err(status_error(status, &body, symbol));
        }

        serde_json::from_str(&body).map_err(|e| {
            DecodeSnafu {
                message: e.to_string(),
            }
            .build()
        })
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        validate_symbol(&params.symbol)?;

        let url = endpoint(&self.chart_base, &CHART_PATH, &params.symbol)?;
        let envelope: ChartEnvelope = self
            .get_json(url, &chart_query(&params), &params.symbol)
            .await?;
        let series = into_bar_series(envelope, &params)?;

        info!(
            symbol = %series.symbol,
            interval = %series.interval,
            bars = series.len(),
            "fetched bars"
        );
        Ok(series)
    }

    async fn fetch_profile(
        &self,
        symbol: &str,
        category: ProfileCategory,
    ) -> Result<Profile, ProviderError> {
        validate_symbol(symbol)?;

        let url = endpoint(&self.summary_base, &SUMMARY_PATH, symbol)?;
        let envelope: SummaryEnvelope = self
            .get_json(url, &summary_query(category), symbol)
            .await?;
        let profile = into_profile(envelope, symbol, category)?;

        info!(symbol, %category, fields = profile.fields.len(), "fetched profile");
        Ok(profile)
    }
}

fn parse_base(raw: &str) -> Result<Url, ProviderInitError> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .context(InvalidBaseUrlSnafu { url: raw })
}

/// `base` + fixed path + the symbol as one percent-encoded segment.
fn endpoint(base: &Url, path: &[&str], symbol: &str) -> Result<Url, ProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            ValidationSnafu {
                message: format!("base URL {base} cannot carry a path"),
            }
            .build()
        })?
        .pop_if_empty()
        .extend(path)
        .push(symbol);
    Ok(url)
}

fn status_error(status: StatusCode, body: &str, symbol: &str) -> ProviderError {
    if let Some(error) = upstream_error(body) {
        return error.into_provider_error(symbol);
    }
    if status == StatusCode::NOT_FOUND {
        return NotFoundSnafu { symbol }.build();
    }
    let snippet: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    ApiSnafu {
        message: format!("HTTP {status}: {snippet}"),
    }
    .build()
}
