//! Synthetic raw-series generation for offline/demo runs.
//!
//! `liq --sample` exercises the full pipeline without a FRED key: each
//! indicator gets a seeded random walk at its native frequency, long enough
//! that every derived metric has sufficient history. Deterministic per seed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::SeriesBundle;
use crate::domain::{Indicator, OverlayAsset};
use crate::error::AppError;
use crate::series::RawSeries;

/// Fixed anchor so sample runs are reproducible across wall-clock days.
fn sample_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 26).expect("valid anchor date")
}

/// Generate the full bundle for the required indicators plus `overlays`.
pub fn sample_bundle(seed: u64, overlays: &[OverlayAsset]) -> Result<SeriesBundle, AppError> {
    let mut bundle = SeriesBundle::default();
    for indicator in Indicator::ALL {
        bundle
            .indicators
            .insert(indicator, sample_indicator(indicator, seed)?);
    }
    for &asset in overlays {
        bundle.overlays.insert(asset, sample_overlay(asset, seed)?);
    }
    Ok(bundle)
}

/// One indicator series at its native frequency.
pub fn sample_indicator(indicator: Indicator, seed: u64) -> Result<RawSeries, AppError> {
    let end = sample_end_date();
    match indicator {
        // WALCL: weekly, millions of dollars.
        Indicator::BalanceSheet => walk(
            indicator.series_id(),
            seed,
            weekly_dates(end, 180),
            6_800_000.0,
            2_500.0,
            18_000.0,
            1_000.0,
        ),
        // M2SL: monthly, billions of dollars.
        Indicator::MoneySupply => walk(
            indicator.series_id(),
            seed,
            monthly_dates(end, 42),
            20_500.0,
            30.0,
            45.0,
            1.0,
        ),
        // IPMANSICS: monthly index.
        Indicator::ManufacturingProduction => walk(
            indicator.series_id(),
            seed,
            monthly_dates(end, 42),
            99.0,
            0.05,
            0.7,
            1.0,
        ),
        // WTREGEN: weekly, millions of dollars.
        Indicator::TreasuryCashBalance => walk(
            indicator.series_id(),
            seed,
            weekly_dates(end, 180),
            650_000.0,
            0.0,
            28_000.0,
            1_000.0,
        ),
        // RRPONTSYD: business-daily, millions of dollars.
        Indicator::OvernightReverseRepo => walk(
            indicator.series_id(),
            seed,
            business_daily_dates(end, 900),
            400_000.0,
            -250.0,
            9_000.0,
            0.0,
        ),
    }
}

/// One overlay asset price series (business-daily).
pub fn sample_overlay(asset: OverlayAsset, seed: u64) -> Result<RawSeries, AppError> {
    let end = sample_end_date();
    match asset {
        OverlayAsset::Btc => walk(
            asset.series_id(),
            seed,
            business_daily_dates(end, 900),
            45_000.0,
            25.0,
            1_200.0,
            100.0,
        ),
        OverlayAsset::Spx => walk(
            asset.series_id(),
            seed,
            business_daily_dates(end, 900),
            4_800.0,
            0.8,
            40.0,
            100.0,
        ),
    }
}

/// Additive random walk over the given dates, floored to stay meaningful.
fn walk(
    series_id: &str,
    seed: u64,
    dates: Vec<NaiveDate>,
    start: f64,
    drift: f64,
    vol: f64,
    floor: f64,
) -> Result<RawSeries, AppError> {
    let mut rng = StdRng::seed_from_u64(series_seed(series_id, seed));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let mut out = Vec::with_capacity(dates.len());
    let mut value = start;
    for date in dates {
        out.push((date, value));
        let z: f64 = normal.sample(&mut rng);
        value = (value + drift + vol * z).max(floor);
    }
    Ok(out)
}

fn series_seed(series_id: &str, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    series_id.hash(&mut hasher);
    seed.hash(&mut hasher);
    hasher.finish()
}

fn weekly_dates(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = (0..n)
        .map(|i| end - Duration::days(7 * i as i64))
        .collect();
    dates.reverse();
    dates
}

fn monthly_dates(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut months = end.year() * 12 + end.month() as i32 - 1;
    for _ in 0..n {
        let y = months.div_euclid(12);
        let m = months.rem_euclid(12) as u32 + 1;
        // Mid-month observation date, as FRED publishes monthly levels.
        dates.push(NaiveDate::from_ymd_opt(y, m, 15).expect("valid synthetic date"));
        months -= 1;
    }
    dates.reverse();
    dates
}

fn business_daily_dates(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut cur = end;
    while dates.len() < n {
        if !matches!(cur.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(cur);
        }
        match cur.pred_opt() {
            Some(prev) => cur = prev,
            None => break,
        }
    }
    dates.reverse();
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WEEKLY_YOY_LOOKBACK;

    #[test]
    fn sample_is_deterministic_per_seed() {
        let a = sample_bundle(42, &[OverlayAsset::Btc]).unwrap();
        let b = sample_bundle(42, &[OverlayAsset::Btc]).unwrap();
        for indicator in Indicator::ALL {
            assert_eq!(a.indicator(indicator), b.indicator(indicator));
        }
        assert_eq!(a.overlay(OverlayAsset::Btc), b.overlay(OverlayAsset::Btc));

        let c = sample_bundle(43, &[]).unwrap();
        assert_ne!(
            a.indicator(Indicator::BalanceSheet),
            c.indicator(Indicator::BalanceSheet)
        );
    }

    #[test]
    fn sample_series_cover_the_required_history() {
        let bundle = sample_bundle(7, &[]).unwrap();
        // Enough weekly points for a 52-period YoY plus a year of evaluations.
        assert!(bundle.indicator(Indicator::BalanceSheet).len() > 2 * WEEKLY_YOY_LOOKBACK);
        // Enough monthly points for a 12-month YoY plus slack.
        assert!(bundle.indicator(Indicator::MoneySupply).len() >= 40);
        assert!(bundle.indicator(Indicator::OvernightReverseRepo).len() >= 800);
    }

    #[test]
    fn sample_values_respect_floors() {
        let bundle = sample_bundle(99, &[]).unwrap();
        assert!(
            bundle
                .indicator(Indicator::OvernightReverseRepo)
                .iter()
                .all(|&(_, v)| v >= 0.0)
        );
    }

    #[test]
    fn business_daily_dates_skip_weekends() {
        let dates = business_daily_dates(sample_end_date(), 10);
        assert!(
            dates
                .iter()
                .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        );
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }
}
