use std::path::PathBuf;

use alphadash::{
    chart::PriceChartOptions,
    logging,
    providers::build_provider,
    research,
    server::{self, AppState},
    settings::resolve_settings,
};
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about = "Alphadash stock research dashboard")]
struct Cli {
    /// Settings file (TOML); defaults apply when omitted.
    #[arg(long, value_name = "FILE", env = "ALPHADASH_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Serve the HTTP API.
    Serve {
        /// Listen address, overriding the settings.
        #[arg(long)]
        addr: Option<std::net::SocketAddr>,
    },
    /// Print the research card of a symbol as JSON.
    Summary { symbol: String },
    /// Print the price chart of a symbol as JSON.
    Price(PriceArgs),
    /// Print the dividend chart of a symbol as JSON.
    Dividends { symbol: String },
}

#[derive(Args)]
struct PriceArgs {
    symbol: String,
    /// D, W or M.
    #[arg(long, default_value = "D")]
    interval: String,
    /// Open, High, Low or Close.
    #[arg(long)]
    field: Option<String>,
    /// line or candles.
    #[arg(long)]
    style: Option<String>,
    /// Moving averages, e.g. "50,200".
    #[arg(long)]
    sma: Option<String>,
    #[arg(long)]
    volume: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let settings = resolve_settings(cli.config.as_deref()).context("loading settings")?;
    let provider = build_provider(&settings.provider).context("building provider")?;
    let today = Local::now().date_naive();

    match cli.cmd {
        Cmd::Serve { addr } => {
            let addr = addr.unwrap_or(settings.server.addr);
            server::serve(AppState::new(settings, provider), addr).await?;
        }
        Cmd::Summary { symbol } => {
            let card = research::research_card(provider.as_ref(), &symbol, &settings).await?;
            print_json(&card)?;
        }
        Cmd::Price(args) => {
            let opts = PriceChartOptions::from_controls(
                args.field.as_deref(),
                args.style.as_deref(),
                args.sma.as_deref(),
                Some(args.volume),
            )?;
            let fig = research::price_figure(
                provider.as_ref(),
                &args.symbol,
                &args.interval,
                &opts,
                &settings,
            )
            .await?;
            print_json(&fig)?;
        }
        Cmd::Dividends { symbol } => {
            let fig =
                research::dividend_figure_for(provider.as_ref(), &symbol, &settings, today).await?;
            print_json(&fig)?;
        }
    }

    Ok(())
}
