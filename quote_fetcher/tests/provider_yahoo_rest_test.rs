use std::{collections::HashMap, num::NonZeroU32};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use quote_fetcher::{
    models::{interval::Interval, profile::ProfileCategory, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderError,
        yahoo_rest::{YahooConfig, YahooProvider},
    },
};
use serde_json::json;

async fn chart(
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !headers.contains_key("user-agent") {
        return (StatusCode::FORBIDDEN, "no user agent").into_response();
    }
    if query.get("range").map(String::as_str) != Some("10y")
        || query.get("interval").map(String::as_str) != Some("1d")
    {
        return (StatusCode::BAD_REQUEST, "unexpected query").into_response();
    }
    match symbol.as_str() {
        "KO" => Json(json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "KO", "exchangeTimezoneName": "America/New_York", "gmtoffset": -14400 },
                    // 2024-06-13, 2024-06-14, 2024-06-17 at 13:30Z
                    "timestamp": [1718285400, 1718371800, 1718631000],
                    "events": { "dividends": { "1718285400": { "amount": 0.485, "date": 1718285400 } } },
                    "indicators": { "quote": [{
                        "open":   [62.9, 63.1, 63.4],
                        "high":   [63.5, 63.6, 64.0],
                        "low":    [62.7, 62.9, 63.2],
                        "close":  [63.2, 63.4, 63.9],
                        "volume": [12000000, 11000000, 9000000]
                    }] }
                }],
                "error": null
            }
        }))
        .into_response(),
        "ZZZZ" => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } }
            })),
        )
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn summary(
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if symbol != "KO" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "quoteSummary": { "result": null, "error": { "code": "Not Found", "description": "Quote not found" } }
            })),
        )
            .into_response();
    }
    let module = query.get("modules").cloned().unwrap_or_default();
    let payload = match module.as_str() {
        "assetProfile" => json!({
            "sector": "Consumer Defensive",
            "fullTimeEmployees": 79100,
            "companyOfficers": [{ "name": "Mr. James Robert B. Quincey", "age": 58, "title": "Chairman & CEO" }]
        }),
        "summaryDetail" => json!({
            "marketCap": { "raw": 272_000_000_000u64, "fmt": "272B" },
            "previousClose": { "raw": 63.9, "fmt": "63.90" }
        }),
        _ => json!({ "exchange": "NYQ", "shortName": "Coca-Cola Company (The)" }),
    };
    let mut result = serde_json::Map::new();
    result.insert(module, payload);
    Json(json!({ "quoteSummary": { "result": [result], "error": null } })).into_response()
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/v8/finance/chart/{symbol}", get(chart))
        .route("/v10/finance/quoteSummary/{symbol}", get(summary));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn provider() -> YahooProvider {
    let base = spawn_upstream().await;
    let config = YahooConfig {
        chart_base_url: base.clone(),
        summary_base_url: base,
        ..YahooConfig::default()
    };
    YahooProvider::new(&config).expect("provider")
}

fn ten_years(symbol: &str) -> BarsRequestParams {
    BarsRequestParams::daily(symbol, NonZeroU32::new(10).unwrap())
}

#[tokio::test]
async fn fetches_daily_bars_with_dividends() {
    let provider = provider().await;
    let series = provider.fetch_bars(ten_years("KO")).await.unwrap();

    assert_eq!(series.symbol, "KO");
    assert_eq!(series.interval, Interval::Daily);
    assert_eq!(series.len(), 3);
    assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());
    assert_eq!(series.bars[2].date, NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());

    let paid = series.dividend_bars();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].dividend, 0.485);
}

#[tokio::test]
async fn unknown_symbol_is_not_found() {
    let provider = provider().await;
    let err = provider.fetch_bars(ten_years("ZZZZ")).await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound { .. }), "{err}");
}

#[tokio::test]
async fn server_error_is_api_error() {
    let provider = provider().await;
    let err = provider.fetch_bars(ten_years("BOOM")).await.unwrap_err();
    match err {
        ProviderError::Api { message, .. } => assert!(message.contains("boom"), "{message}"),
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn invalid_symbol_never_reaches_upstream() {
    let provider = provider().await;
    let err = provider.fetch_bars(ten_years("A B")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Validation { .. }));
}

#[tokio::test]
async fn fetches_each_profile_category() {
    let provider = provider().await;

    let asset = provider
        .fetch_profile("KO", ProfileCategory::AssetProfile)
        .await
        .unwrap();
    assert_eq!(asset.get_str("sector"), Some("Consumer Defensive"));
    assert_eq!(asset.get_object_list("companyOfficers").len(), 1);

    let detail = provider
        .fetch_profile("KO", ProfileCategory::SummaryDetail)
        .await
        .unwrap();
    assert_eq!(detail.get_f64("marketCap"), Some(272_000_000_000.0));

    let quote = provider
        .fetch_profile("KO", ProfileCategory::QuoteType)
        .await
        .unwrap();
    assert_eq!(quote.get_str("exchange"), Some("NYQ"));
}

#[tokio::test]
async fn unknown_profile_symbol_is_not_found() {
    let provider = provider().await;
    let err = provider
        .fetch_profile("NOPE", ProfileCategory::QuoteType)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotFound { .. }));
}

#[tokio::test]
#[ignore]
async fn live_yahoo_fetch() {
    // Hits the real endpoints; run with `--ignored` when network access is available.
    let provider = YahooProvider::from_env().expect("provider");
    let series = provider.fetch_bars(ten_years("AAPL")).await.unwrap();
    assert!(series.len() > 2000, "expected ~10y of daily bars");
}
