//! Unit and label formatting for the research card.
//!
//! Magnitudes are abbreviated by the length of their decimal text, not by
//! `log10`: `"123456789"` has nine characters and becomes millions. Values
//! under a thousand still get a `K` suffix (`999 -> "1.0K"`), and a float's
//! trailing `.0` counts towards the length. Numbers render the way the page
//! always showed them: shortest round-trip text with at least one decimal.
//!
//! ```
//! use alphadash::format::{exchange_label, format_magnitude};
//!
//! assert_eq!(format_magnitude(123_456_789_u64), "123.46M");
//! assert_eq!(format_magnitude(999_u64), "1.0K");
//! assert_eq!(exchange_label("NMS", "-"), "NASDAQ");
//! assert_eq!(exchange_label("XXX", "-"), "-");
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const KILO: f64 = 1_000.0;
const MILLION: f64 = 1_000.0 * KILO;
const BILLION: f64 = 1_000.0 * MILLION;
const TRILLION: f64 = 1_000.0 * BILLION;

const IPO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";

/// A number with a canonical decimal text form.
pub trait DecimalRepr: Copy {
    /// Decimal text whose length picks the magnitude unit.
    fn decimal_repr(&self) -> String;
    fn as_f64(&self) -> f64;
}

impl DecimalRepr for u64 {
    fn decimal_repr(&self) -> String {
        self.to_string()
    }
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl DecimalRepr for i64 {
    fn decimal_repr(&self) -> String {
        self.to_string()
    }
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl DecimalRepr for f64 {
    fn decimal_repr(&self) -> String {
        float_text(*self)
    }
    fn as_f64(&self) -> f64 {
        *self
    }
}

/// Abbreviate `value` with a K/M/B/T suffix, two decimals.
pub fn format_magnitude<T: DecimalRepr>(value: T) -> String {
    let digits = value.decimal_repr().len();
    let (unit, suffix) = match digits {
        13.. => (TRILLION, 'T'),
        10..=12 => (BILLION, 'B'),
        7..=9 => (MILLION, 'M'),
        _ => (KILO, 'K'),
    };
    format!("{}{suffix}", float_text(round_to(value.as_f64() / unit, 2)))
}

/// [`format_magnitude`] for a JSON profile value; `None` if it is not a number.
pub fn format_magnitude_value(value: &Value) -> Option<String> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(u) = n.as_u64() {
        Some(format_magnitude(u))
    } else if let Some(i) = n.as_i64() {
        Some(format_magnitude(i))
    } else {
        n.as_f64().map(format_magnitude)
    }
}

/// Full exchange name for a short ICE code.
pub fn exchange_name(code: &str) -> Option<&'static str> {
    match code {
        "NMS" => Some("NASDAQ"),
        "NYS" | "NYQ" => Some("New York Stock Exchange"),
        "NYO" => Some("New York Options Exchange"),
        "CBT" => Some("Chicago Board of Trade"),
        "ASE" => Some("American Stock Exchange"),
        "MID" => Some("Chicago Stock Exchange"),
        _ => None,
    }
}

/// [`exchange_name`] with `placeholder` for unknown codes.
pub fn exchange_label(code: &str, placeholder: &str) -> String {
    exchange_name(code).unwrap_or(placeholder).to_string()
}

/// Text for a scalar profile value. Null, arrays and objects have none.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(float_text)
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders an IPO date as `"Dec 12, 1980"`.
///
/// Accepts `"YYYY-MM-DD HH:MM:SS"`, a bare `"YYYY-MM-DD"`, or epoch seconds.
pub fn format_ipo_date(value: &Value) -> Option<String> {
    let date = match value {
        Value::String(s) => {
            let s = s.trim();
            NaiveDateTime::parse_from_str(s, IPO_DATE_FORMAT)
                .map(|dt| dt.date())
                .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
                .ok()?
        }
        Value::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp(secs, 0)?.date_naive()
        }
        _ => return None,
    };
    Some(date.format(DISPLAY_DATE_FORMAT).to_string())
}

/// Round to `places` decimals, deciding on the exact binary value of `x`.
///
/// `0.005` is stored slightly above the tie and rounds to `0.01`, where
/// scaling by 100 first would land on `0.5` and round to zero.
pub fn round_to(x: f64, places: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{x:.prec$}", prec = places as usize)
        .parse()
        .unwrap_or(x)
}

/// Price rounded to cents, as shown after a `$`.
pub fn price_text(x: f64) -> String {
    float_text(round_to(x, 2))
}

/// Shortest round-trip text, always with a decimal point for finite whole values.
pub fn float_text(x: f64) -> String {
    format!("{x:?}")
}
