//! HTTP API behind the research and backtest pages.
//!
//! Every route is a thin adapter over [`crate::research`] and
//! [`crate::backtest`]. Caller mistakes (unknown interval, bad chart option,
//! empty symbol, invalid form) are `400` with the error text; upstream failures
//! never surface as errors because the research functions degrade to
//! placeholders.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    backtest::{BacktestForm, panel_view, progress, run_output},
    chart::PriceChartOptions,
    providers::SharedProvider,
    research::{self, ResearchError},
    settings::Settings,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub provider: SharedProvider,
    /// Fixed calendar date; `None` uses the local date of each request.
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(settings: Settings, provider: SharedProvider) -> Self {
        Self {
            settings: Arc::new(settings),
            provider,
            today: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    lookback_years: u32,
}

#[derive(Debug, Default, Deserialize)]
struct PriceQuery {
    interval: Option<String>,
    field: Option<String>,
    style: Option<String>,
    sma: Option<String>,
    volume: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct CountQuery {
    n: Option<u64>,
}

#[derive(Serialize)]
struct RunOutput {
    output: Option<String>,
}

fn bad_request(err: impl std::fmt::Display) -> Response {
    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
}

fn research_response<T: Serialize>(result: Result<T, ResearchError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => bad_request(err),
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/research/{symbol}/summary", get(summary))
        .route("/api/research/{symbol}/price", get(price))
        .route("/api/research/{symbol}/dividends", get(dividends))
        .route("/api/backtest/form", get(backtest_form))
        .route("/api/backtest/validate", post(backtest_validate))
        .route("/api/backtest/progress", get(backtest_progress))
        .route("/api/backtest/run", get(backtest_run))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving dashboard API");
    axum::serve(listener, router(state)).await
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        lookback_years: state.settings.lookback_years.get(),
    })
}

async fn summary(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    research_response(research::research_card(state.provider.as_ref(), &symbol, &state.settings).await)
}

async fn price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Response {
    let opts = match PriceChartOptions::from_controls(
        query.field.as_deref(),
        query.style.as_deref(),
        query.sma.as_deref(),
        query.volume,
    ) {
        Ok(opts) => opts,
        Err(err) => return bad_request(err),
    };
    let interval = query.interval.as_deref().unwrap_or("D");
    research_response(
        research::price_figure(
            state.provider.as_ref(),
            &symbol,
            interval,
            &opts,
            &state.settings,
        )
        .await,
    )
}

async fn dividends(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    let today = state.today();
    research_response(
        research::dividend_figure_for(state.provider.as_ref(), &symbol, &state.settings, today)
            .await,
    )
}

async fn backtest_form(State(state): State<AppState>) -> impl IntoResponse {
    Json(panel_view(&state.settings, state.today()))
}

async fn backtest_validate(
    State(state): State<AppState>,
    Json(form): Json<BacktestForm>,
) -> Response {
    match form.validate(&state.settings, state.today()) {
        Ok(form) => Json(form).into_response(),
        Err(err) => bad_request(err),
    }
}

async fn backtest_progress(Query(query): Query<CountQuery>) -> impl IntoResponse {
    Json(progress(query.n.unwrap_or(0)))
}

async fn backtest_run(Query(query): Query<CountQuery>) -> impl IntoResponse {
    Json(RunOutput {
        output: run_output(query.n),
    })
}
