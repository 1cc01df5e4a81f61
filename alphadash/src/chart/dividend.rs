//! Dividend history chart: fiscal-year yield line over per-payment bars.

use chrono::NaiveDate;
use quote_fetcher::models::bar::Bar;

use super::{
    Axis, BarTrace, Figure, Font, Layout, Line, Margin, Marker, RangeSelector, RangeSlider,
    SECONDARY_Y, Scatter, Title, Trace,
};
use crate::{
    dividend::fiscal_year_yields,
    format::{float_text, price_text, round_to},
    settings::Theme,
};

pub const NO_DIVIDEND_TEXT: &str = "Does not pay dividend";

const MARKER_COLOR: &str = "#0645AD";
const YIELD_LINE_COLOR: &str = "#27AE60";
const PAYMENT_EDGE_COLOR: &str = "#E53935";

/// Dividend chart for bars that pay a dividend.
///
/// The yield line is plotted at each fiscal year end and labelled
/// `FYyy: x%`; every payment is a bar with its own hover text.
pub fn dividend_chart(dividend_bars: &[Bar], today: NaiveDate, theme: &Theme) -> Figure {
    let yields = fiscal_year_yields(dividend_bars, today);

    let yield_line = Trace::Scatter(Scatter {
        x: yields.iter().map(|y| y.year_end).collect(),
        y: yields.iter().map(|y| Some(y.yield_pct)).collect(),
        name: Some("DPS".to_string()),
        texttemplate: Some(
            yields
                .iter()
                .map(|y| format!("{}: {}%", y.label, float_text(round_to(y.yield_pct, 2))))
                .collect(),
        ),
        textposition: Some("top center".to_string()),
        hoverinfo: Some("none".to_string()),
        mode: Some("markers+lines+text".to_string()),
        marker: Some(Marker {
            color: Some(MARKER_COLOR.to_string()),
            opacity: Some(1.0),
            size: Some(13.0),
            line: Some(Line::new(YIELD_LINE_COLOR, 3.0)),
        }),
        line: Some(Line::new(YIELD_LINE_COLOR, 2.5)),
        visible: true,
        showlegend: false,
        yaxis: Some(SECONDARY_Y.to_string()),
        ..Scatter::default()
    });

    let payments = Trace::Bar(BarTrace {
        x: dividend_bars.iter().map(|b| b.date).collect(),
        y: dividend_bars.iter().map(|b| round_to(b.dividend, 2)).collect(),
        text: Some(
            dividend_bars
                .iter()
                .map(|b| {
                    format!(
                        "Issued On: {}<br>Yield/Share: ${}",
                        b.date,
                        price_text(b.dividend)
                    )
                })
                .collect(),
        ),
        hoverinfo: Some("text".to_string()),
        marker: Some(Marker {
            color: Some(MARKER_COLOR.to_string()),
            opacity: Some(0.4),
            size: None,
            line: Some(Line::new(PAYMENT_EDGE_COLOR, 3.0)),
        }),
        visible: true,
        showlegend: false,
        ..BarTrace::default()
    });

    Figure {
        data: vec![yield_line, payments],
        layout: Layout {
            title: Some(Title {
                text: "Dividend History".to_string(),
            }),
            height: Some(550),
            font: Some(Font {
                family: Some(theme.font.clone()),
                size: Some(16),
            }),
            bargap: Some(0.9),
            plot_bgcolor: Some(theme.plot_background.clone()),
            margin: Some(Margin {
                t: Some(90),
                r: Some(0),
                b: Some(45),
                l: Some(0),
            }),
            xaxis: Some(Axis {
                showgrid: Some(true),
                mirror: Some(true),
                rangeslider: Some(RangeSlider { visible: false }),
                rangeselector: Some(RangeSelector {
                    x: 0.33,
                    buttons: Vec::new(),
                }),
                ..Axis::framed()
            }),
            yaxis: Some(Axis {
                zeroline: Some(false),
                showticklabels: Some(true),
                tickformat: Some("$.2f".to_string()),
                showgrid: Some(false),
                ..Axis::framed()
            }),
            yaxis2: Some(
                Axis {
                    zeroline: Some(false),
                    showticklabels: Some(false),
                    showgrid: Some(false),
                    ..Axis::framed()
                }
                .secondary(),
            ),
            annotations: Vec::new(),
        },
    }
}

/// Dividend chart for any bars, or the "no dividend" placeholder when none pay.
pub fn dividend_figure(bars: &[Bar], today: NaiveDate, theme: &Theme) -> Figure {
    let paying: Vec<Bar> = bars.iter().filter(|b| b.pays_dividend()).cloned().collect();
    if paying.is_empty() {
        return Figure::placeholder(NO_DIVIDEND_TEXT);
    }
    dividend_chart(&paying, today, theme)
}
