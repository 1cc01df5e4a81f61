//! regroup.rs — daily to weekly/monthly bar resampling
//!
//! - Week buckets end on Friday. A Saturday or Sunday bar belongs to the
//!   following Friday, so a week runs Saturday..=Friday.
//! - Month buckets end on the last calendar day of the month.
//! - Each output bar is dated at its bucket end, never at the first input date.
//! - Buckets without input bars are not emitted.
//!
//! Aggregation per bucket: first open, max high, min low, last close, summed
//! volume and summed dividend.
//!
//! All functions assume the input is ascending by date, which [`BarSeries::new`]
//! guarantees.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use quote_fetcher::models::{
    bar::Bar,
    bar_series::BarSeries,
    interval::{Interval, IntervalError},
};

/// Resample a daily series to `interval`. Daily returns an identical copy.
pub fn regroup(series: &BarSeries, interval: Interval) -> BarSeries {
    let bars = match interval {
        Interval::Daily => return series.clone(),
        Interval::Weekly => aggregate(&series.bars, week_end),
        Interval::Monthly => aggregate(&series.bars, month_end),
    };
    BarSeries {
        symbol: series.symbol.clone(),
        interval,
        bars,
    }
}

/// Same as [`regroup`] but takes the dashboard tag (`D`, `W`, `M`).
///
/// An unknown tag is an [`IntervalError::InvalidArgument`].
pub fn regroup_tagged(series: &BarSeries, tag: &str) -> Result<BarSeries, IntervalError> {
    let interval: Interval = tag.parse()?;
    Ok(regroup(series, interval))
}

/// Bucket end of the Friday-anchored week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let from_monday = date.weekday().num_days_from_monday();
    let friday = Weekday::Fri.num_days_from_monday();
    let ahead = (friday + 7 - from_monday) % 7;
    date + Days::new(u64::from(ahead))
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        // only reachable at NaiveDate::MAX's month
        .unwrap_or(NaiveDate::MAX)
}

fn aggregate(bars: &[Bar], bucket_end: fn(NaiveDate) -> NaiveDate) -> Vec<Bar> {
    let mut out: Vec<Bar> = Vec::new();
    for bar in bars {
        let end = bucket_end(bar.date);
        match out.last_mut() {
            Some(acc) if acc.date == end => {
                acc.high = acc.high.max(bar.high);
                acc.low = acc.low.min(bar.low);
                acc.close = bar.close;
                acc.volume = acc.volume.saturating_add(bar.volume);
                acc.dividend += bar.dividend;
            }
            _ => out.push(Bar {
                date: end,
                ..bar.clone()
            }),
        }
    }
    out
}
