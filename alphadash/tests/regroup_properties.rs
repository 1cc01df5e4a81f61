use alphadash::regroup::{month_end, regroup, week_end};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use proptest::prelude::*;
use quote_fetcher::models::{bar::Bar, bar_series::BarSeries, interval::Interval};

/// (days since previous bar, open, close, wick up, wick down, volume)
type Row = (u64, f64, f64, f64, f64, u64);

fn build(rows: &[Row]) -> BarSeries {
    let mut date = NaiveDate::from_ymd_opt(2019, 12, 27).unwrap();
    let bars = rows
        .iter()
        .map(|&(gap, open, close, up, down, volume)| {
            date = date + Days::new(gap);
            Bar::new(
                date,
                open,
                open.max(close) + up,
                open.min(close) - down,
                close,
                volume,
            )
        })
        .collect();
    BarSeries::new("PROP", Interval::Daily, bars).unwrap()
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    proptest::collection::vec(
        (
            1u64..5,
            1.0f64..500.0,
            1.0f64..500.0,
            0.0f64..10.0,
            0.0f64..0.9,
            0u64..10_000_000,
        ),
        0..300,
    )
}

fn check_buckets(daily: &BarSeries, grouped: &BarSeries, bucket_end: fn(NaiveDate) -> NaiveDate) {
    assert!(grouped.bars.windows(2).all(|w| w[0].date < w[1].date));
    for out in &grouped.bars {
        let members: Vec<&Bar> = daily
            .bars
            .iter()
            .filter(|b| bucket_end(b.date) == out.date)
            .collect();
        assert!(!members.is_empty(), "bucket {} has no members", out.date);
        assert_eq!(out.open, members[0].open);
        assert_eq!(out.close, members[members.len() - 1].close);
        let high = members.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low = members.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        assert_eq!(out.high, high);
        assert_eq!(out.low, low);
        assert_eq!(out.volume, members.iter().map(|b| b.volume).sum::<u64>());
    }
    let covered: usize = grouped
        .bars
        .iter()
        .map(|out| daily.bars.iter().filter(|b| bucket_end(b.date) == out.date).count())
        .sum();
    assert_eq!(covered, daily.len());
}

proptest! {
    #[test]
    fn daily_is_identity(rows in rows()) {
        let daily = build(&rows);
        prop_assert_eq!(regroup(&daily, Interval::Daily), daily);
    }

    #[test]
    fn weekly_buckets_aggregate_their_days(rows in rows()) {
        let daily = build(&rows);
        let weekly = regroup(&daily, Interval::Weekly);
        prop_assert!(weekly.bars.iter().all(|b| b.date.weekday() == Weekday::Fri));
        check_buckets(&daily, &weekly, week_end);
    }

    #[test]
    fn monthly_buckets_aggregate_their_days(rows in rows()) {
        let daily = build(&rows);
        let monthly = regroup(&daily, Interval::Monthly);
        prop_assert!(monthly.bars.iter().all(|b| (b.date + Days::new(1)).day() == 1));
        check_buckets(&daily, &monthly, month_end);
    }

    #[test]
    fn output_never_longer_than_input(rows in rows()) {
        let daily = build(&rows);
        prop_assert!(regroup(&daily, Interval::Weekly).len() <= daily.len());
        prop_assert!(regroup(&daily, Interval::Monthly).len() <= daily.len());
    }
}
