//! Bar interval tags.
//!
//! The dashboard offers three granularities and names them with one-letter
//! tags (`D`, `W`, `M`). Parsing is strict: an unknown tag is an
//! [`IntervalError::InvalidArgument`], never a silent fallback to daily.
//!
//! ```
//! use quote_fetcher::models::interval::Interval;
//!
//! let weekly: Interval = "W".parse().unwrap();
//! assert_eq!(weekly, Interval::Weekly);
//! assert_eq!(weekly.to_string(), "W");
//! assert!("Q".parse::<Interval>().is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("invalid interval tag {tag:?}: expected D, W or M")]
    InvalidArgument { tag: String },
}

/// Calendar granularity of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    /// One trading day.
    #[default]
    #[serde(rename = "D", alias = "daily")]
    Daily,
    /// Week ending Friday.
    #[serde(rename = "W", alias = "weekly")]
    Weekly,
    /// Calendar month.
    #[serde(rename = "M", alias = "monthly")]
    Monthly,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Daily, Interval::Weekly, Interval::Monthly];

    /// One-letter tag used by the dashboard controls.
    pub const fn tag(&self) -> &'static str {
        match self {
            Interval::Daily => "D",
            Interval::Weekly => "W",
            Interval::Monthly => "M",
        }
    }

    /// Human label shown in the dropdowns.
    pub const fn label(&self) -> &'static str {
        match self {
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // one-letter tags are case-sensitive ("m" is not "M"), words are not
        match trimmed {
            "D" => return Ok(Interval::Daily),
            "W" => return Ok(Interval::Weekly),
            "M" => return Ok(Interval::Monthly),
            _ => {}
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Interval::Daily),
            "weekly" | "week" => Ok(Interval::Weekly),
            "monthly" | "month" => Ok(Interval::Monthly),
            _ => Err(IntervalError::InvalidArgument { tag: s.to_string() }),
        }
    }
}
