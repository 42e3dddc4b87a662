//! Historical series builder.
//!
//! Drives the normalizer, the YoY calculators, the short-window delta, and
//! the classifier once per evaluation date to produce an ordered sequence of
//! snapshots. Pure function of the raw series and the window parameters, so
//! re-running with identical inputs yields an identical sequence.

use chrono::{Datelike, Duration, NaiveDate};
use rayon::prelude::*;

use crate::data::SeriesBundle;
use crate::domain::{HistoryConfig, Indicator, OverlayAsset, Resolution, Snapshot};
use crate::error::AppError;
use crate::metrics::{monthly_yoy_from_resampled, short_window_delta, weekly_yoy};
use crate::series::NormalizedSeries;
use crate::signal::classify;

/// Normalized inputs shared (read-only) across evaluation dates.
struct NormalizedBundle {
    fed: NormalizedSeries,
    m2_monthly: NormalizedSeries,
    mfg_monthly: NormalizedSeries,
    tga: NormalizedSeries,
    rrp: NormalizedSeries,
    /// Overlay series with their rebase base value.
    overlays: Vec<(OverlayAsset, NormalizedSeries, f64)>,
}

/// Build the ordered snapshot sequence for the configured window.
///
/// The window end is the earliest latest-available date across the required
/// indicators (not the wall clock), so no snapshot claims data that does not
/// yet exist for one of them. Per-date computation runs in parallel; output
/// order is by date ascending regardless of execution order.
pub fn build_history(
    bundle: &SeriesBundle,
    config: &HistoryConfig,
) -> Result<Vec<Snapshot>, AppError> {
    let end = common_end(bundle)
        .ok_or_else(|| AppError::data("No observations in any required series."))?;
    let start = end - Duration::days(config.window_days as i64);
    let resolution = config.resolution();
    let dates = evaluation_dates(start, end, resolution);

    let normalized = normalize_bundle(bundle, config, start, end);

    let snapshots: Vec<Snapshot> = dates
        .par_iter()
        .map(|&date| snapshot_at(&normalized, date, resolution, config.unit_scale))
        .collect();

    Ok(snapshots)
}

/// Earliest "latest available date" across required indicators.
///
/// Indicators with no data at all are skipped; `None` when every required
/// series is empty.
fn common_end(bundle: &SeriesBundle) -> Option<NaiveDate> {
    Indicator::ALL
        .iter()
        .filter_map(|&ind| NormalizedSeries::from_raw(bundle.indicator(ind)).last_date())
        .min()
}

fn normalize_bundle(
    bundle: &SeriesBundle,
    config: &HistoryConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> NormalizedBundle {
    let m2 = NormalizedSeries::from_raw(bundle.indicator(Indicator::MoneySupply));
    let mfg = NormalizedSeries::from_raw(bundle.indicator(Indicator::ManufacturingProduction));

    let mut overlays = Vec::new();
    for &asset in &config.overlays {
        let Some(raw) = bundle.overlay(asset) else {
            continue;
        };
        let series = NormalizedSeries::from_raw(raw);
        if let Some(base) = overlay_base(&series, start, end) {
            overlays.push((asset, series, base));
        }
        // A degraded overlay (no usable in-window data) is simply omitted.
    }

    NormalizedBundle {
        fed: NormalizedSeries::from_raw(bundle.indicator(Indicator::BalanceSheet)),
        m2_monthly: m2.monthly_resampled(),
        mfg_monthly: mfg.monthly_resampled(),
        tga: NormalizedSeries::from_raw(bundle.indicator(Indicator::TreasuryCashBalance)),
        rrp: NormalizedSeries::from_raw(bundle.indicator(Indicator::OvernightReverseRepo)),
        overlays,
    }
}

/// First overlay value in the window: the nearest value at or before the
/// window start, else the first observation inside the window.
fn overlay_base(series: &NormalizedSeries, start: NaiveDate, end: NaiveDate) -> Option<f64> {
    if let Some(v) = series.value_at_or_before(start) {
        if v != 0.0 {
            return Some(v);
        }
    }
    series
        .points()
        .iter()
        .find(|(d, v)| *d > start && *d <= end && *v != 0.0)
        .map(|(_, v)| *v)
}

fn evaluation_dates(start: NaiveDate, end: NaiveDate, resolution: Resolution) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    match resolution {
        Resolution::Daily => {
            let mut d = start;
            while d <= end {
                dates.push(d);
                let Some(next) = d.succ_opt() else { break };
                d = next;
            }
        }
        Resolution::Monthly => {
            let mut months = start.year() * 12 + start.month() as i32 - 1;
            loop {
                let me = month_end(months);
                if me > end {
                    break;
                }
                if me >= start {
                    dates.push(me);
                }
                months += 1;
            }
            if dates.last() != Some(&end) {
                dates.push(end);
            }
        }
    }
    dates
}

/// Last calendar day of the month given as a zero-based month counter.
fn month_end(months: i32) -> NaiveDate {
    let next = months + 1;
    let first_of_next = NaiveDate::from_ymd_opt(
        next.div_euclid(12),
        next.rem_euclid(12) as u32 + 1,
        1,
    )
    .expect("valid month counter");
    first_of_next.pred_opt().expect("month end exists")
}

fn snapshot_at(
    nb: &NormalizedBundle,
    date: NaiveDate,
    resolution: Resolution,
    unit_scale: f64,
) -> Snapshot {
    let fed_yoy = weekly_yoy(&nb.fed, Some(date));
    let m2_yoy = monthly_yoy_from_resampled(&nb.m2_monthly, Some(date));

    // Manufacturing is the one metric carried as "possibly missing": no
    // observation at or before the date means no reading, which biases the
    // signal toward NEUTRAL.
    let manufacturing_yoy = nb
        .mfg_monthly
        .index_at_or_before(date)
        .map(|_| monthly_yoy_from_resampled(&nb.mfg_monthly, Some(date)));

    let tga_rrp_4wk_change = short_window_delta(&nb.tga, &nb.rrp, date, resolution, unit_scale);

    let signal = classify(fed_yoy, m2_yoy, manufacturing_yoy, tga_rrp_4wk_change);

    let mut btc_index = None;
    let mut spx_index = None;
    for (asset, series, base) in &nb.overlays {
        let index = series
            .value_at_or_before(date)
            .map(|v| (v / base - 1.0) * 100.0);
        match asset {
            OverlayAsset::Btc => btc_index = index,
            OverlayAsset::Spx => spx_index = index,
        }
    }

    Snapshot {
        date,
        fed_yoy,
        m2_yoy,
        manufacturing_yoy,
        tga_rrp_4wk_change,
        signal,
        btc_index,
        spx_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn weekly(start: NaiveDate, values: &[f64]) -> Vec<(NaiveDate, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + Duration::days(7 * i as i64), v))
            .collect()
    }

    fn monthly(year: i32, values: &[f64]) -> Vec<(NaiveDate, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let months = year * 12 + i as i32;
                (
                    NaiveDate::from_ymd_opt(months / 12, (months % 12) as u32 + 1, 15).unwrap(),
                    v,
                )
            })
            .collect()
    }

    /// A small deterministic bundle: growing fed/M2/production, shrinking
    /// TGA+RRP, so late evaluation dates classify RISK-ON.
    fn test_bundle() -> SeriesBundle {
        let start = d(2022, 1, 6);
        let fed: Vec<f64> = (0..160).map(|i| 7_000_000.0 + 10_000.0 * i as f64).collect();
        let tga: Vec<f64> = (0..160).map(|i| 800_000.0 - 2_000.0 * i as f64).collect();
        let rrp: Vec<f64> = (0..160).map(|i| 500_000.0 - 1_500.0 * i as f64).collect();
        let m2: Vec<f64> = (0..40).map(|i| 20_000.0 + 50.0 * i as f64).collect();
        let mfg: Vec<f64> = (0..40).map(|i| 98.0 + 0.1 * i as f64).collect();

        let mut indicators = HashMap::new();
        indicators.insert(Indicator::BalanceSheet, weekly(start, &fed));
        indicators.insert(Indicator::TreasuryCashBalance, weekly(start, &tga));
        indicators.insert(Indicator::OvernightReverseRepo, weekly(start, &rrp));
        indicators.insert(Indicator::MoneySupply, monthly(2022, &m2));
        indicators.insert(Indicator::ManufacturingProduction, monthly(2022, &mfg));

        SeriesBundle {
            indicators,
            overlays: HashMap::new(),
        }
    }

    #[test]
    fn history_is_deterministic() {
        let bundle = test_bundle();
        let config = HistoryConfig {
            window_days: 90,
            ..HistoryConfig::default()
        };
        let a = build_history(&bundle, &config).unwrap();
        let b = build_history(&bundle, &config).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(a.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn daily_window_yields_one_snapshot_per_day() {
        let bundle = test_bundle();
        let config = HistoryConfig {
            window_days: 10,
            ..HistoryConfig::default()
        };
        let snapshots = build_history(&bundle, &config).unwrap();
        assert_eq!(snapshots.len(), 11);
        assert!(
            snapshots
                .windows(2)
                .all(|w| w[1].date - w[0].date == Duration::days(1))
        );
    }

    #[test]
    fn window_end_is_earliest_latest_date_across_indicators() {
        let mut bundle = test_bundle();
        // Truncate RRP so it ends well before the others.
        let rrp = bundle
            .indicators
            .get_mut(&Indicator::OvernightReverseRepo)
            .unwrap();
        rrp.truncate(120);
        let rrp_end = rrp.last().unwrap().0;

        let config = HistoryConfig {
            window_days: 30,
            ..HistoryConfig::default()
        };
        let snapshots = build_history(&bundle, &config).unwrap();
        assert_eq!(snapshots.last().unwrap().date, rrp_end);
    }

    #[test]
    fn monthly_window_evaluates_month_ends_plus_end() {
        let bundle = test_bundle();
        let config = HistoryConfig {
            window_days: 540,
            ..HistoryConfig::default()
        };
        assert_eq!(config.resolution(), Resolution::Monthly);

        let snapshots = build_history(&bundle, &config).unwrap();
        let end = snapshots.last().unwrap().date;
        for s in &snapshots {
            let is_month_end = s.date.succ_opt().unwrap().day() == 1;
            assert!(is_month_end || s.date == end, "unexpected date {}", s.date);
        }
        assert!(snapshots.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn late_snapshots_classify_risk_on_in_growth_regime() {
        let bundle = test_bundle();
        let config = HistoryConfig {
            window_days: 30,
            ..HistoryConfig::default()
        };
        let snapshots = build_history(&bundle, &config).unwrap();
        let last = snapshots.last().unwrap();
        assert!(last.fed_yoy > 0.0);
        assert!(last.m2_yoy > 0.0);
        assert!(last.manufacturing_yoy.is_some_and(|m| m > 0.0));
        assert!(last.tga_rrp_4wk_change < 0.0);
        assert_eq!(last.signal, Signal::RiskOn);
    }

    #[test]
    fn missing_manufacturing_biases_neutral() {
        let mut bundle = test_bundle();
        bundle
            .indicators
            .insert(Indicator::ManufacturingProduction, Vec::new());

        let config = HistoryConfig {
            window_days: 30,
            ..HistoryConfig::default()
        };
        let snapshots = build_history(&bundle, &config).unwrap();
        for s in &snapshots {
            assert_eq!(s.manufacturing_yoy, None);
            assert_eq!(s.signal, Signal::Neutral);
        }
    }

    #[test]
    fn all_required_series_empty_is_an_error() {
        let bundle = SeriesBundle::default();
        let config = HistoryConfig::default();
        assert!(build_history(&bundle, &config).is_err());
    }

    #[test]
    fn overlay_rebases_to_window_start_and_degrades_gracefully() {
        let mut bundle = test_bundle();
        let end = d(2025, 1, 23); // bundle's weekly end (160 weeks from 2022-01-06)
        let overlay = vec![
            (end - Duration::days(40), 100.0),
            (end - Duration::days(10), 150.0),
            (end, 200.0),
        ];
        bundle.overlays.insert(OverlayAsset::Spx, overlay);

        let config = HistoryConfig {
            window_days: 30,
            overlays: vec![OverlayAsset::Spx, OverlayAsset::Btc],
            ..HistoryConfig::default()
        };
        let snapshots = build_history(&bundle, &config).unwrap();

        let first = snapshots.first().unwrap();
        let last = snapshots.last().unwrap();
        // Base is the value at or before the window start (100.0).
        assert_eq!(first.spx_index, Some(0.0));
        assert_eq!(last.spx_index, Some(100.0));
        // BTC was requested but has no data: omitted, not an error.
        assert_eq!(last.btc_index, None);
    }
}
