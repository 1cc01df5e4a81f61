//! Declarative chart descriptions for the browser-side Plotly surface.
//!
//! A [`Figure`] serialises to the `{ "data": [...], "layout": {...} }` object
//! that `Plotly.react` takes. Only the attributes the dashboard sets are
//! modelled; unset options are omitted from the JSON so Plotly's own defaults
//! apply.
//!
//! Charts follow a two-axis subplot layout: price traces sit on `y2` (right
//! side, overlaying) and volume or per-payment bars on the primary `y` axis.
//!
//! Builders:
//! - price history: [`ohlc::ohlc_chart`]
//! - dividend history: [`dividend::dividend_chart`], [`dividend::dividend_figure`]
//! - text-only placeholder: [`Figure::placeholder`]

pub mod dividend;
pub mod ohlc;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

pub use dividend::{dividend_chart, dividend_figure};
pub use ohlc::{ChartStyle, MovingAverage, PriceChartOptions, PriceField, ohlc_chart};

/// Axis id of the right-hand price axis.
pub const SECONDARY_Y: &str = "y2";

const AXIS_LINE_COLOR: &str = "black";

/// A chart control received a value it does not know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {name} {value:?}")]
pub struct ChartOptionError {
    pub name: &'static str,
    pub value: String,
}

/// Traces plus layout, ready for `Plotly.react`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// An empty chart showing only `text`, axes hidden.
    pub fn placeholder(text: impl Into<String>) -> Self {
        let hidden = || Axis {
            visible: Some(false),
            ..Axis::default()
        };
        Self {
            data: Vec::new(),
            layout: Layout {
                xaxis: Some(hidden()),
                yaxis: Some(hidden()),
                annotations: vec![Annotation {
                    text: text.into(),
                    font: Some(Font {
                        family: None,
                        size: Some(20),
                    }),
                    ..Annotation::paper()
                }],
                ..Layout::default()
            },
        }
    }

    /// Text of the first annotation, which is what a placeholder shows.
    pub fn placeholder_text(&self) -> Option<&str> {
        if !self.data.is_empty() {
            return None;
        }
        self.layout.annotations.first().map(|a| a.text.as_str())
    }
}

/// One visual series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(Scatter),
    Candlestick(Candlestick),
    Bar(BarTrace),
}

impl Trace {
    pub fn name(&self) -> Option<&str> {
        match self {
            Trace::Scatter(t) => t.name.as_deref(),
            Trace::Candlestick(t) => t.name.as_deref(),
            Trace::Bar(t) => t.name.as_deref(),
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Trace::Scatter(t) => t.visible,
            Trace::Candlestick(t) => t.visible,
            Trace::Bar(t) => t.visible,
        }
    }
}

/// Line and marker trace. `None` values in `y` are gaps.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scatter {
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texttemplate: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub visible: bool,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Candlestick {
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    pub visible: bool,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BarTrace {
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    pub visible: bool,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

impl Line {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Margin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linecolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showspikes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikethickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikecolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikemode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikesnap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeselector: Option<RangeSelector>,
}

impl Axis {
    /// Thin black frame line, the base of every visible axis.
    pub fn framed() -> Self {
        Self {
            showline: Some(true),
            linewidth: Some(1.0),
            linecolor: Some(AXIS_LINE_COLOR.to_string()),
            ..Self::default()
        }
    }

    /// Right-hand axis drawn over the primary one.
    pub fn secondary(self) -> Self {
        Self {
            overlaying: Some("y".to_string()),
            side: Some("right".to_string()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RangeSelector {
    pub x: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<RangeButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub label: String,
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<String>,
}

impl RangeButton {
    pub fn backward(count: u32, label: &str, step: &str) -> Self {
        Self {
            count: Some(count),
            label: label.to_string(),
            step: step.to_string(),
            stepmode: Some("backward".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub xref: String,
    pub yref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub showarrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicktoshow: Option<bool>,
}

impl Annotation {
    /// Arrowless annotation positioned relative to the whole plot area.
    pub fn paper() -> Self {
        Self {
            text: String::new(),
            xref: "paper".to_string(),
            yref: "paper".to_string(),
            x: None,
            y: None,
            showarrow: false,
            font: None,
            align: None,
            opacity: None,
            clicktoshow: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholder_serialises_like_a_bare_layout() {
        let fig = Figure::placeholder("Does not pay dividend");
        assert_eq!(fig.placeholder_text(), Some("Does not pay dividend"));
        assert_eq!(
            serde_json::to_value(&fig).unwrap(),
            json!({
                "data": [],
                "layout": {
                    "xaxis": { "visible": false },
                    "yaxis": { "visible": false },
                    "annotations": [{
                        "text": "Does not pay dividend",
                        "xref": "paper",
                        "yref": "paper",
                        "showarrow": false,
                        "font": { "size": 20 }
                    }]
                }
            })
        );
    }

    #[test]
    fn traces_are_tagged_by_type() {
        let trace = Trace::Bar(BarTrace {
            x: vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
            y: vec![1.5],
            ..BarTrace::default()
        });
        let v = serde_json::to_value(&trace).unwrap();
        assert_eq!(v["type"], "bar");
        assert_eq!(v["x"], json!(["2024-01-02"]));
        assert!(v.get("name").is_none());
    }

    #[test]
    fn gaps_serialise_as_null() {
        let trace = Trace::Scatter(Scatter {
            y: vec![None, Some(2.0)],
            ..Scatter::default()
        });
        let v = serde_json::to_value(&trace).unwrap();
        assert_eq!(v["y"], json!([null, 2.0]));
    }
}
