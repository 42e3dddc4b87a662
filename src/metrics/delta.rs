//! Short-window delta: change of (TGA + RRP) over a fixed recent lookback,
//! in billions of dollars.
//!
//! Two lookback policies, selected by resolution mode:
//!
//! - daily: forward-fill onto the calendar, look back 20 business days
//! - monthly: month-end resample, look back to the most recent monthly value
//!   at or before (D − 28 calendar days)
//!
//! The 20-business-day and 28-calendar-day lookbacks are not equivalent
//! approximations of "4 weeks"; they are kept as separate policies.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::{
    DAILY_DELTA_LOOKBACK_BDAYS, MIN_DELTA_OBSERVATIONS, MONTHLY_DELTA_LOOKBACK_DAYS, Resolution,
};
use crate::series::NormalizedSeries;

/// Δ = (a_now + b_now) − (a_then + b_then), scaled by `unit_scale`.
///
/// Either series with fewer than 4 observations at or before `asof` makes the
/// whole delta 0.0. A missing value at `now` or `then` after forward-fill
/// contributes 0 for that component (lossy default, not a silent NaN).
pub fn short_window_delta(
    a: &NormalizedSeries,
    b: &NormalizedSeries,
    asof: NaiveDate,
    resolution: Resolution,
    unit_scale: f64,
) -> f64 {
    if !has_min_history(a, asof) || !has_min_history(b, asof) {
        return 0.0;
    }

    let (now, then) = match resolution {
        Resolution::Daily => {
            let then_date = minus_business_days(asof, DAILY_DELTA_LOOKBACK_BDAYS);
            (
                component(a, asof) + component(b, asof),
                component(a, then_date) + component(b, then_date),
            )
        }
        Resolution::Monthly => {
            let then_date = asof - chrono::Duration::days(MONTHLY_DELTA_LOOKBACK_DAYS);
            let a_m = a.monthly_resampled();
            let b_m = b.monthly_resampled();
            (
                component(&a_m, asof) + component(&b_m, asof),
                component(&a_m, then_date) + component(&b_m, then_date),
            )
        }
    };

    (now - then) / unit_scale
}

fn component(series: &NormalizedSeries, asof: NaiveDate) -> f64 {
    series.value_at_or_before(asof).unwrap_or(0.0)
}

fn has_min_history(series: &NormalizedSeries, asof: NaiveDate) -> bool {
    series
        .index_at_or_before(asof)
        .is_some_and(|i| i + 1 >= MIN_DELTA_OBSERVATIONS)
}

/// Step back `n` business days (Mon–Fri), counting only landed weekdays.
fn minus_business_days(date: NaiveDate, n: u32) -> NaiveDate {
    let mut d = date;
    let mut left = n;
    while left > 0 {
        let Some(prev) = d.pred_opt() else {
            break;
        };
        d = prev;
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            left -= 1;
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNIT_SCALE_BILLIONS;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// One point per business day, ending at `end` inclusive.
    fn business_daily_series(end: NaiveDate, values: &[f64]) -> NormalizedSeries {
        let mut dates = Vec::with_capacity(values.len());
        let mut cur = end;
        for _ in 0..values.len() {
            while matches!(cur.weekday(), Weekday::Sat | Weekday::Sun) {
                cur = cur.pred_opt().unwrap();
            }
            dates.push(cur);
            cur = cur.pred_opt().unwrap();
        }
        dates.reverse();
        let raw: Vec<(NaiveDate, f64)> =
            dates.into_iter().zip(values.iter().copied()).collect();
        NormalizedSeries::from_raw(&raw)
    }

    #[test]
    fn minus_business_days_skips_weekends() {
        // Friday 2024-03-08 minus 5 business days is Friday 2024-03-01.
        assert_eq!(minus_business_days(d(2024, 3, 8), 5), d(2024, 3, 1));
        // Monday minus 1 business day is the previous Friday.
        assert_eq!(minus_business_days(d(2024, 3, 11), 1), d(2024, 3, 8));
    }

    #[test]
    fn daily_delta_unit_scaling() {
        // TGA flat at 1000 until the final day jumps to 1200; RRP all zero.
        // Δ = (1200 − 1000) / 1_000_000 = 0.0002 billions.
        let end = d(2024, 3, 8); // a Friday
        let mut tga_values = vec![1000.0; 25];
        tga_values.push(1200.0);
        let tga = business_daily_series(end, &tga_values);
        let rrp = business_daily_series(end, &vec![0.0; 26]);

        let delta = short_window_delta(&tga, &rrp, end, Resolution::Daily, UNIT_SCALE_BILLIONS);
        assert!((delta - 0.0002).abs() < 1e-12, "got {delta}");
    }

    #[test]
    fn delta_requires_four_observations_on_both_series() {
        let end = d(2024, 3, 8);
        let tga = business_daily_series(end, &[1000.0, 1000.0, 1200.0]);
        let rrp = business_daily_series(end, &vec![0.0; 26]);
        assert_eq!(
            short_window_delta(&tga, &rrp, end, Resolution::Daily, UNIT_SCALE_BILLIONS),
            0.0
        );

        let empty = NormalizedSeries::from_raw(&[]);
        assert_eq!(
            short_window_delta(&empty, &rrp, end, Resolution::Daily, UNIT_SCALE_BILLIONS),
            0.0
        );
    }

    #[test]
    fn daily_delta_missing_then_component_defaults_to_zero() {
        // Series starts fewer than 20 business days before `asof`, so the
        // `then` lookup has no value and that component counts as 0.
        let end = d(2024, 3, 8);
        let tga = business_daily_series(end, &[500.0, 500.0, 500.0, 500.0]);
        let rrp = business_daily_series(end, &[0.0, 0.0, 0.0, 0.0]);
        let delta = short_window_delta(&tga, &rrp, end, Resolution::Daily, UNIT_SCALE_BILLIONS);
        assert!((delta - 500.0 / UNIT_SCALE_BILLIONS).abs() < 1e-15);
    }

    #[test]
    fn monthly_delta_uses_28_calendar_day_lookback() {
        // Month-end values: Jan=100, Feb=150, Mar=400 (observed mid-month).
        let tga = NormalizedSeries::from_raw(&[
            (d(2024, 1, 31), 100.0),
            (d(2024, 2, 29), 150.0),
            (d(2024, 3, 15), 400.0),
            (d(2024, 3, 29), 400.0),
        ]);
        let rrp = NormalizedSeries::from_raw(&[
            (d(2024, 1, 31), 0.0),
            (d(2024, 2, 29), 0.0),
            (d(2024, 3, 15), 0.0),
            (d(2024, 3, 29), 0.0),
        ]);

        // asof 2024-03-29 − 28d = 2024-03-01: most recent monthly value at or
        // before that is February's 150.
        let delta =
            short_window_delta(&tga, &rrp, d(2024, 3, 29), Resolution::Monthly, UNIT_SCALE_BILLIONS);
        assert!(((delta * UNIT_SCALE_BILLIONS) - 250.0).abs() < 1e-9, "got {delta}");
    }
}
