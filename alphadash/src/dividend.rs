//! Dividend yield per US federal fiscal year (October through September).

use chrono::{Datelike, NaiveDate};
use quote_fetcher::models::bar::Bar;
use serde::Serialize;

/// Last month of the fiscal year.
const FISCAL_YEAR_END_MONTH: u32 = 9;

/// Summed dividend yield for one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiscalYearYield {
    /// `FYyy`, e.g. `FY23` for October 2022 through September 2023.
    pub label: String,
    /// September 30 closing the fiscal year.
    pub year_end: NaiveDate,
    /// Sum of `100 * dividend / close` over the payments in the year.
    pub yield_pct: f64,
}

/// Fiscal year (named by its ending calendar year) that `date` falls in.
pub fn fiscal_year(date: NaiveDate) -> i32 {
    if date.month() > FISCAL_YEAR_END_MONTH {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Yield per fiscal year for the given dividend-paying bars.
///
/// Years between the first and last payment are present even without a
/// payment. The first year is always dropped since the lookback window starts
/// part way through it, and before October the running year is dropped as
/// well.
pub fn fiscal_year_yields(dividend_bars: &[Bar], today: NaiveDate) -> Vec<FiscalYearYield> {
    let years: Vec<i32> = dividend_bars.iter().map(|b| fiscal_year(b.date)).collect();
    let (Some(&first), Some(&last)) = (years.iter().min(), years.iter().max()) else {
        return Vec::new();
    };

    let mut sums = vec![0.0_f64; (last - first + 1) as usize];
    for (bar, year) in dividend_bars.iter().zip(&years) {
        if bar.close != 0.0 {
            sums[(year - first) as usize] += 100.0 * bar.dividend / bar.close;
        }
    }

    let mut out: Vec<FiscalYearYield> = (first..=last)
        .zip(sums)
        .skip(1)
        .filter_map(|(year, yield_pct)| {
            let year_end = NaiveDate::from_ymd_opt(year, FISCAL_YEAR_END_MONTH, 30)?;
            Some(FiscalYearYield {
                label: format!("FY{}", year_end.format("%y")),
                year_end,
                yield_pct,
            })
        })
        .collect();

    if today.month() <= FISCAL_YEAR_END_MONTH {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn paid(date: NaiveDate, close: f64, dividend: f64) -> Bar {
        Bar::new(date, close, close, close, close, 1).with_dividend(dividend)
    }

    #[test]
    fn fiscal_year_starts_in_october() {
        assert_eq!(fiscal_year(d(2022, 9, 30)), 2022);
        assert_eq!(fiscal_year(d(2022, 10, 1)), 2023);
        assert_eq!(fiscal_year(d(2023, 1, 15)), 2023);
    }

    #[test]
    fn drops_first_and_running_year_before_october() {
        let bars = vec![
            paid(d(2020, 8, 7), 100.0, 1.0),  // FY20, dropped
            paid(d(2020, 11, 6), 100.0, 1.0), // FY21
            paid(d(2021, 2, 5), 50.0, 1.0),   // FY21
            paid(d(2023, 2, 10), 100.0, 1.0), // FY23
            paid(d(2024, 2, 9), 100.0, 1.0),  // FY24, running
        ];
        let yields = fiscal_year_yields(&bars, d(2024, 6, 1));
        let labels: Vec<_> = yields.iter().map(|y| y.label.as_str()).collect();
        assert_eq!(labels, vec!["FY21", "FY22", "FY23"]);
        assert_eq!(yields[0].yield_pct, 3.0);
        assert_eq!(yields[1].yield_pct, 0.0);
        assert_eq!(yields[2].year_end, d(2023, 9, 30));
    }

    #[test]
    fn keeps_running_year_from_october() {
        let bars = vec![
            paid(d(2022, 5, 1), 100.0, 1.0),
            paid(d(2023, 5, 1), 100.0, 2.0),
        ];
        let yields = fiscal_year_yields(&bars, d(2023, 10, 2));
        assert_eq!(yields.len(), 1);
        assert_eq!(yields[0].label, "FY23");
        assert_eq!(yields[0].yield_pct, 2.0);
    }

    #[test]
    fn no_payments_no_years() {
        assert!(fiscal_year_yields(&[], d(2024, 1, 1)).is_empty());
        // a single fiscal year is always dropped
        let one = vec![paid(d(2023, 3, 1), 10.0, 0.1)];
        assert!(fiscal_year_yields(&one, d(2023, 11, 1)).is_empty());
    }
}
