//! Backtest control panel: selectors, form defaults and validation, progress bar
//! and the run button status line.
//!
//! Only the panel exists. Submitting a valid form does not run a strategy;
//! there is no engine behind the selectors.

use chrono::{Months, NaiveDate};
use quote_fetcher::models::interval::Interval;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{chart::PriceField, research::normalize_symbol, settings::Settings};

pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_BALANCE: f64 = 10_000.0;

/// Ticks after which the decorative progress bar starts over.
const PROGRESS_CYCLE: u64 = 110;
/// Values below this show no label inside the bar.
const PROGRESS_LABEL_MIN: u8 = 5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("balance must be positive, got {0}")]
    NonPositiveBalance(f64),
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("{field} date {date} is outside {min}..={max}")]
    OutOfWindow {
        field: &'static str,
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
}

/// Label and value of one dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    #[serde(rename = "BH")]
    BuyAndHold,
    #[serde(rename = "DCA")]
    DollarCostAveraging,
    #[serde(rename = "BLSH")]
    BuyLowSellHigh,
    #[serde(rename = "MAC")]
    MovingAverageCross,
    #[serde(rename = "RSI")]
    Momentum,
    #[serde(rename = "BBC")]
    BollingerCross,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::BuyAndHold,
        Strategy::DollarCostAveraging,
        Strategy::BuyLowSellHigh,
        Strategy::MovingAverageCross,
        Strategy::Momentum,
        Strategy::BollingerCross,
    ];

    pub const fn code(&self) -> &'static str {
        match self {
            Strategy::BuyAndHold => "BH",
            Strategy::DollarCostAveraging => "DCA",
            Strategy::BuyLowSellHigh => "BLSH",
            Strategy::MovingAverageCross => "MAC",
            Strategy::Momentum => "RSI",
            Strategy::BollingerCross => "BBC",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Strategy::BuyAndHold => "Buy and Hold",
            Strategy::DollarCostAveraging => "Dollar Cost Averaging",
            Strategy::BuyLowSellHigh => "Buy low, Sell high",
            Strategy::MovingAverageCross => "Crossing the Moving Average",
            Strategy::Momentum => "Positive/Negative Momentum (RSI)",
            Strategy::BollingerCross => "Crossing the Bollinger Bands",
        }
    }
}

/// Position sizing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeRule {
    #[default]
    Flat,
    Kelly,
    None,
}

impl SizeRule {
    pub const ALL: [SizeRule; 3] = [SizeRule::Flat, SizeRule::Kelly, SizeRule::None];

    pub const fn code(&self) -> &'static str {
        match self {
            SizeRule::Flat => "Flat",
            SizeRule::Kelly => "Kelly",
            SizeRule::None => "None",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            SizeRule::Flat => "Flat",
            SizeRule::Kelly => "Kelly",
            SizeRule::None => "More",
        }
    }
}

/// Broad market index to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Benchmark {
    #[serde(rename = "^GSPC")]
    SP500,
    #[serde(rename = "^DJI")]
    Dow,
    #[serde(rename = "^IXIC")]
    Nasdaq,
    #[serde(rename = "^RUT")]
    Russell,
}

impl Benchmark {
    pub const ALL: [Benchmark; 4] = [
        Benchmark::SP500,
        Benchmark::Dow,
        Benchmark::Nasdaq,
        Benchmark::Russell,
    ];

    /// Index ticker, e.g. `^GSPC`.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Benchmark::SP500 => "^GSPC",
            Benchmark::Dow => "^DJI",
            Benchmark::Nasdaq => "^IXIC",
            Benchmark::Russell => "^RUT",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Benchmark::SP500 => "S&P 500",
            Benchmark::Dow => "Dow",
            Benchmark::Nasdaq => "NASDAQ",
            Benchmark::Russell => "Russell",
        }
    }
}

/// Dates the pickers allow: `lookback_years` before `today` up to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateWindow {
    pub fn new(settings: &Settings, today: NaiveDate) -> Self {
        let months = Months::new(settings.lookback_years.get().saturating_mul(12));
        Self {
            min: today.checked_sub_months(months).unwrap_or(NaiveDate::MIN),
            max: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.min..=self.max).contains(&date)
    }
}

/// Values of every control on the backtest panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestForm {
    pub symbol: String,
    pub balance: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub interval: Interval,
    #[serde(default)]
    pub field: PriceField,
    #[serde(default)]
    pub size_rule: SizeRule,
    #[serde(default)]
    pub benchmark: Option<Benchmark>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl BacktestForm {
    /// The panel as first rendered.
    pub fn with_defaults(settings: &Settings, today: NaiveDate) -> Self {
        let window = DateWindow::new(settings, today);
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            balance: DEFAULT_BALANCE,
            start: window.min,
            end: window.max,
            interval: Interval::Daily,
            field: PriceField::Close,
            size_rule: SizeRule::Flat,
            benchmark: None,
            strategy: Strategy::BuyAndHold,
        }
    }

    /// Checks the form and returns it with the symbol normalised.
    pub fn validate(mut self, settings: &Settings, today: NaiveDate) -> Result<Self, FormError> {
        self.symbol = normalize_symbol(&self.symbol).map_err(|_| FormError::EmptySymbol)?;
        if self.balance.is_nan() || self.balance <= 0.0 {
            return Err(FormError::NonPositiveBalance(self.balance));
        }
        if self.start > self.end {
            return Err(FormError::StartAfterEnd {
                start: self.start,
                end: self.end,
            });
        }
        let window = DateWindow::new(settings, today);
        for (field, date) in [("start", self.start), ("end", self.end)] {
            if !window.contains(date) {
                return Err(FormError::OutOfWindow {
                    field,
                    date,
                    min: window.min,
                    max: window.max,
                });
            }
        }
        Ok(self)
    }
}

/// Defaults plus every selector's choices, for rendering the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub defaults: BacktestForm,
    pub window: DateWindow,
    pub intervals: Vec<Choice>,
    pub fields: Vec<Choice>,
    pub size_rules: Vec<Choice>,
    pub benchmarks: Vec<Choice>,
    pub strategies: Vec<Choice>,
}

pub fn panel_view(settings: &Settings, today: NaiveDate) -> PanelView {
    let fields = [
        PriceField::Close,
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
    ];
    PanelView {
        defaults: BacktestForm::with_defaults(settings, today),
        window: DateWindow::new(settings, today),
        intervals: Interval::ALL
            .iter()
            .map(|i| Choice {
                label: i.label(),
                value: i.tag(),
            })
            .collect(),
        fields: fields
            .iter()
            .map(|f| Choice {
                label: f.upper_name(),
                value: f.name(),
            })
            .collect(),
        size_rules: SizeRule::ALL
            .iter()
            .map(|s| Choice {
                label: s.label(),
                value: s.code(),
            })
            .collect(),
        benchmarks: Benchmark::ALL
            .iter()
            .map(|b| Choice {
                label: b.label(),
                value: b.symbol(),
            })
            .collect(),
        strategies: Strategy::ALL
            .iter()
            .map(|s| Choice {
                label: s.label(),
                value: s.code(),
            })
            .collect(),
    }
}

/// State of the timer-driven progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub value: u8,
    pub label: String,
}

/// Progress after `n_intervals` timer ticks: climbs to 100, holds, then restarts.
pub fn progress(n_intervals: u64) -> Progress {
    let value = (n_intervals % PROGRESS_CYCLE).min(100) as u8;
    let label = if value >= PROGRESS_LABEL_MIN {
        format!("{value} %")
    } else {
        String::new()
    };
    Progress { value, label }
}

/// Status line under the run button after `n_clicks` presses; nothing before the first.
pub fn run_output(n_clicks: Option<u64>) -> Option<String> {
    n_clicks
        .filter(|&n| n > 0)
        .map(|n| format!("Output loaded {n} times"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn defaults_span_the_lookback_window() {
        let form = BacktestForm::with_defaults(&Settings::default(), d(2024, 2, 29));
        assert_eq!(form.symbol, "AAPL");
        assert_eq!(form.balance, 10_000.0);
        assert_eq!(form.start, d(2014, 2, 28));
        assert_eq!(form.end, d(2024, 2, 29));
        assert_eq!(form.strategy, Strategy::BuyAndHold);
        assert_eq!(form.benchmark, None);
    }

    #[test]
    fn validation_rules() {
        let settings = Settings::default();
        let today = d(2024, 6, 3);
        let base = BacktestForm::with_defaults(&settings, today);

        let ok = BacktestForm {
            symbol: " msft ".to_string(),
            ..base.clone()
        }
        .validate(&settings, today)
        .unwrap();
        assert_eq!(ok.symbol, "MSFT");

        let broke = BacktestForm {
            balance: 0.0,
            ..base.clone()
        };
        assert_eq!(
            broke.validate(&settings, today),
            Err(FormError::NonPositiveBalance(0.0))
        );

        let flipped = BacktestForm {
            start: d(2024, 1, 2),
            end: d(2023, 1, 2),
            ..base.clone()
        };
        assert!(matches!(
            flipped.validate(&settings, today),
            Err(FormError::StartAfterEnd { .. })
        ));

        let future = BacktestForm {
            end: d(2024, 6, 4),
            ..base.clone()
        };
        assert!(matches!(
            future.validate(&settings, today),
            Err(FormError::OutOfWindow { field: "end", .. })
        ));

        let ancient = BacktestForm {
            start: d(2000, 1, 3),
            ..base
        };
        assert!(matches!(
            ancient.validate(&settings, today),
            Err(FormError::OutOfWindow { field: "start", .. })
        ));
    }

    #[test]
    fn form_deserialises_dashboard_codes() {
        let form: BacktestForm = serde_json::from_str(
            r#"{"symbol":"ko","balance":2500,"start":"2020-01-02","end":"2021-01-04",
                "interval":"W","field":"High","size_rule":"Kelly","benchmark":"^DJI","strategy":"MAC"}"#,
        )
        .unwrap();
        assert_eq!(form.interval, Interval::Weekly);
        assert_eq!(form.field, PriceField::High);
        assert_eq!(form.size_rule, SizeRule::Kelly);
        assert_eq!(form.benchmark, Some(Benchmark::Dow));
        assert_eq!(form.strategy, Strategy::MovingAverageCross);
    }

    #[test]
    fn panel_lists_every_choice() {
        let view = panel_view(&Settings::default(), d(2024, 6, 3));
        assert_eq!(view.strategies.len(), 6);
        assert_eq!(view.strategies[4].value, "RSI");
        assert_eq!(view.size_rules[2].label, "More");
        assert_eq!(view.benchmarks[0].value, "^GSPC");
        assert_eq!(view.fields[0].label, "CLOSE");
        assert_eq!(view.intervals[2].value, "M");
    }

    #[test]
    fn progress_cycles_and_labels() {
        assert_eq!(progress(0), Progress { value: 0, label: String::new() });
        assert_eq!(progress(4).label, "");
        assert_eq!(progress(5).label, "5 %");
        assert_eq!(progress(105).value, 100);
        assert_eq!(progress(109).label, "100 %");
        assert_eq!(progress(110).value, 0);
        assert_eq!(progress(163).value, 53);
    }

    #[test]
    fn run_output_echoes_clicks() {
        assert_eq!(run_output(None), None);
        assert_eq!(run_output(Some(0)), None);
        assert_eq!(run_output(Some(1)).as_deref(), Some("Output loaded 1 times"));
        assert_eq!(run_output(Some(12)).as_deref(), Some("Output loaded 12 times"));
    }
}
