//! Year-over-year percentage change at two native frequencies.
//!
//! Both modes look back positionally in the series' own sampling: 52
//! observations for weekly series, 12 month-end values for monthly series.
//! Evaluating "as of" a date uses only observations dated at or before it.

use chrono::NaiveDate;

use crate::domain::{MONTHLY_YOY_LOOKBACK, WEEKLY_YOY_LOOKBACK};
use crate::series::NormalizedSeries;

/// YoY for a weekly-native series (e.g., the Fed balance sheet).
///
/// Needs at least 52 prior observations at or before `asof`, else 0.0.
pub fn weekly_yoy(series: &NormalizedSeries, asof: Option<NaiveDate>) -> f64 {
    positional_yoy(series, asof, WEEKLY_YOY_LOOKBACK)
}

/// YoY for a monthly-native series (e.g., M2, industrial production).
///
/// Resamples to one value per calendar month first; needs at least 13
/// monthly points at or before `asof`, else 0.0.
pub fn monthly_yoy(series: &NormalizedSeries, asof: Option<NaiveDate>) -> f64 {
    monthly_yoy_from_resampled(&series.monthly_resampled(), asof)
}

/// Same as [`monthly_yoy`] but on an already month-end-resampled series.
///
/// The history builder resamples once per indicator and reuses it across
/// evaluation dates.
pub fn monthly_yoy_from_resampled(monthly: &NormalizedSeries, asof: Option<NaiveDate>) -> f64 {
    positional_yoy(monthly, asof, MONTHLY_YOY_LOOKBACK)
}

fn positional_yoy(series: &NormalizedSeries, asof: Option<NaiveDate>, lookback: usize) -> f64 {
    let idx = match asof {
        Some(date) => series.index_at_or_before(date),
        None => series.len().checked_sub(1),
    };
    let Some(idx) = idx else {
        return 0.0;
    };
    let Some(prev_idx) = idx.checked_sub(lookback) else {
        return 0.0;
    };

    let current = series.points()[idx].1;
    let year_ago = series.points()[prev_idx].1;
    if year_ago == 0.0 {
        return 0.0;
    }

    (current - year_ago) / year_ago * 100.0
}
