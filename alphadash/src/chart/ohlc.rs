//! Price history chart: candles or a single-field line, moving averages, volume.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use quote_fetcher::models::{bar::Bar, bar_series::BarSeries};
use serde::{Deserialize, Serialize};

use super::{
    Annotation, Axis, BarTrace, Candlestick, ChartOptionError, Figure, Font, Layout, Line, Margin,
    Marker, RangeButton, RangeSelector, RangeSlider, SECONDARY_Y, Scatter, Trace,
};
use crate::{
    format::{price_text, round_to},
    settings::Theme,
};

const PRICE_LINE_COLOR: &str = "#27AE60";
const MA200_COLOR: &str = "rgb(13, 71, 161)";
const MA50_COLOR: &str = "rgb(229, 57, 53)";
const VOLUME_COLOR: &str = "rgba(179, 157, 219, 0.8)";
const VOLUME_MA_COLOR: &str = "#330099";
const PRICE_GRID_COLOR: &str = "rgba(120, 144, 156, 0.2)";

/// Bars averaged by the volume moving average.
const VOLUME_MA_WINDOW: usize = 50;

/// Which price a line chart and the moving averages follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl PriceField {
    pub fn of(&self, bar: &Bar) -> f64 {
        match self {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
        }
    }

    /// Dropdown label.
    pub const fn upper_name(&self) -> &'static str {
        match self {
            PriceField::Open => "OPEN",
            PriceField::High => "HIGH",
            PriceField::Low => "LOW",
            PriceField::Close => "CLOSE",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PriceField {
    type Err = ChartOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            _ => Err(ChartOptionError {
                name: "price field",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Line,
    Candles,
}

impl FromStr for ChartStyle {
    type Err = ChartOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // the page's radio items send true for lines and false for candles
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "lines" | "true" => Ok(ChartStyle::Line),
            "candles" | "candle" | "candlestick" | "false" => Ok(ChartStyle::Candles),
            _ => Err(ChartOptionError {
                name: "chart style",
                value: s.to_string(),
            }),
        }
    }
}

/// Simple moving average overlays offered by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovingAverage {
    #[serde(rename = "50")]
    Sma50,
    #[serde(rename = "200")]
    Sma200,
}

impl MovingAverage {
    pub const fn window(&self) -> usize {
        match self {
            MovingAverage::Sma50 => 50,
            MovingAverage::Sma200 => 200,
        }
    }
}

impl FromStr for MovingAverage {
    type Err = ChartOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "50" => Ok(MovingAverage::Sma50),
            "200" => Ok(MovingAverage::Sma200),
            _ => Err(ChartOptionError {
                name: "moving average",
                value: s.to_string(),
            }),
        }
    }
}

/// Display toggles of the price chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceChartOptions {
    pub field: PriceField,
    pub style: ChartStyle,
    pub moving_averages: Vec<MovingAverage>,
    pub volume: bool,
}

impl PriceChartOptions {
    /// Build options from raw control values; `None` keeps the default.
    ///
    /// `sma` is a comma separated list such as `"50,200"`.
    pub fn from_controls(
        field: Option<&str>,
        style: Option<&str>,
        sma: Option<&str>,
        volume: Option<bool>,
    ) -> Result<Self, ChartOptionError> {
        let mut opts = Self::default();
        if let Some(field) = field {
            opts.field = field.parse()?;
        }
        if let Some(style) = style {
            opts.style = style.parse()?;
        }
        if let Some(sma) = sma {
            for part in sma.split(',').filter(|p| !p.trim().is_empty()) {
                let ma: MovingAverage = part.parse()?;
                if !opts.moving_averages.contains(&ma) {
                    opts.moving_averages.push(ma);
                }
            }
        }
        opts.volume = volume.unwrap_or(false);
        Ok(opts)
    }

    pub fn shows(&self, ma: MovingAverage) -> bool {
        self.moving_averages.contains(&ma)
    }
}

/// Mean of the trailing `window` values rounded to cents, `None` until the window fills.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).checked_sub(window)?;
            let sum: f64 = values[start..=i].iter().sum();
            Some(round_to(sum / window as f64, 2))
        })
        .collect()
}

fn hover_text(bar: &Bar) -> String {
    format!(
        "Open: ${}<br>High: ${}<br>Low: ${}<br>Close: ${}",
        price_text(bar.open),
        price_text(bar.high),
        price_text(bar.low),
        price_text(bar.close)
    )
}

fn range_buttons() -> Vec<RangeButton> {
    vec![
        RangeButton::backward(7, "1W", "day"),
        RangeButton::backward(1, "1M", "month"),
        RangeButton::backward(6, "6M", "month"),
        RangeButton {
            count: Some(1),
            label: "YTD".to_string(),
            step: "year".to_string(),
            stepmode: Some("todate".to_string()),
        },
        RangeButton::backward(1, "1Y", "year"),
        RangeButton::backward(3, "3Y", "year"),
        RangeButton {
            count: None,
            label: "10Y".to_string(),
            step: "all".to_string(),
            stepmode: None,
        },
    ]
}

fn average_trace(
    dates: &[NaiveDate],
    values: &[f64],
    ma: MovingAverage,
    opts: &PriceChartOptions,
) -> Trace {
    let (label, color, width) = match ma {
        MovingAverage::Sma200 => ("200", MA200_COLOR, 1.8),
        MovingAverage::Sma50 => ("50", MA50_COLOR, 1.5),
    };
    Trace::Scatter(Scatter {
        x: dates.to_vec(),
        y: rolling_mean(values, ma.window()),
        name: Some(format!("Mov. Av. ({label}d)")),
        line: Some(Line::new(color, width)),
        hoverinfo: Some("x".to_string()),
        hovertemplate: Some(format!("MA{label}: %{{y:$.1f}}<extra></extra>")),
        visible: opts.shows(ma),
        showlegend: false,
        yaxis: Some(SECONDARY_Y.to_string()),
        ..Scatter::default()
    })
}

/// Price chart for `series` with every overlay present and toggled by visibility.
///
/// Trace order: candles, price line, 200-bar average, 50-bar average, volume,
/// volume average.
pub fn ohlc_chart(
    symbol: &str,
    series: &BarSeries,
    opts: &PriceChartOptions,
    theme: &Theme,
) -> Figure {
    let bars = &series.bars;
    let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
    let hover: Vec<String> = bars.iter().map(hover_text).collect();
    let field_values: Vec<f64> = bars.iter().map(|b| opts.field.of(b)).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    let price_axis = Some(SECONDARY_Y.to_string());

    let candles = Trace::Candlestick(Candlestick {
        x: dates.clone(),
        open: bars.iter().map(|b| b.open).collect(),
        high: bars.iter().map(|b| b.high).collect(),
        low: bars.iter().map(|b| b.low).collect(),
        close: bars.iter().map(|b| b.close).collect(),
        name: Some("Candles".to_string()),
        text: Some(hover.clone()),
        hoverinfo: Some("x+text".to_string()),
        visible: opts.style == ChartStyle::Candles,
        showlegend: false,
        yaxis: price_axis.clone(),
    });

    let line = Trace::Scatter(Scatter {
        x: dates.clone(),
        y: field_values.iter().copied().map(Some).collect(),
        name: Some(format!("{} Price", opts.field)),
        mode: Some("lines".to_string()),
        line: Some(Line::new(PRICE_LINE_COLOR, 2.5)),
        text: Some(hover),
        textposition: Some("top left".to_string()),
        hoverinfo: Some("x+text".to_string()),
        visible: opts.style == ChartStyle::Line,
        showlegend: false,
        yaxis: price_axis,
        ..Scatter::default()
    });

    let volume = Trace::Bar(BarTrace {
        x: dates.clone(),
        y: volumes.clone(),
        name: Some("Volume".to_string()),
        marker: Some(Marker {
            color: Some(VOLUME_COLOR.to_string()),
            ..Marker::default()
        }),
        hoverinfo: Some("x".to_string()),
        hovertemplate: Some("Vol: %{y:.3s}<extra></extra>".to_string()),
        visible: opts.volume,
        showlegend: false,
        ..BarTrace::default()
    });

    let volume_average = Trace::Scatter(Scatter {
        x: dates.clone(),
        y: rolling_mean(&volumes, VOLUME_MA_WINDOW),
        name: Some("Vol. Av. (50d)".to_string()),
        line: Some(Line::new(VOLUME_MA_COLOR, 1.8)),
        hoverinfo: Some("x".to_string()),
        hovertemplate: Some("Vav: %{y:.3s}<extra></extra>".to_string()),
        opacity: Some(0.4),
        visible: opts.volume,
        showlegend: false,
        ..Scatter::default()
    });

    let watermark = Annotation {
        text: symbol.to_string(),
        x: Some(0.5),
        y: Some(0.5),
        font: Some(Font {
            family: Some(theme.font.clone()),
            size: Some(70),
        }),
        align: Some("center".to_string()),
        opacity: Some(0.2),
        clicktoshow: Some(false),
        ..Annotation::paper()
    };

    let layout = Layout {
        height: Some(550),
        font: Some(Font {
            family: Some(theme.font.clone()),
            size: Some(16),
        }),
        plot_bgcolor: Some(theme.plot_background.clone()),
        margin: Some(Margin {
            t: Some(60),
            r: Some(50),
            ..Margin::default()
        }),
        xaxis: Some(Axis {
            showgrid: Some(false),
            mirror: Some(true),
            rangeslider: Some(RangeSlider { visible: false }),
            rangeselector: Some(RangeSelector {
                x: 0.33,
                buttons: range_buttons(),
            }),
            ..Axis::framed()
        }),
        yaxis: Some(Axis {
            zeroline: Some(false),
            showticklabels: Some(false),
            showgrid: Some(false),
            ..Axis::framed()
        }),
        yaxis2: Some(
            Axis {
                zeroline: Some(false),
                showticklabels: Some(true),
                tickformat: Some("$".to_string()),
                showspikes: Some(true),
                spikethickness: Some(1.2),
                spikecolor: Some("slategray".to_string()),
                spikemode: Some("across".to_string()),
                spikesnap: Some("cursor".to_string()),
                showgrid: Some(true),
                gridcolor: Some(PRICE_GRID_COLOR.to_string()),
                ..Axis::framed()
            }
            .secondary(),
        ),
        annotations: vec![watermark],
        ..Layout::default()
    };

    Figure {
        data: vec![
            candles,
            line,
            average_trace(&dates, &field_values, MovingAverage::Sma200, opts),
            average_trace(&dates, &field_values, MovingAverage::Sma50, opts),
            volume,
            volume_average,
        ],
        layout,
    }
}
