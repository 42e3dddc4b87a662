//! Series normalization and point-in-time lookup.
//!
//! FRED gives no ordering or uniqueness guarantees, so everything downstream
//! works on a [`NormalizedSeries`]: dates strictly increasing, duplicates
//! collapsed keeping the later-appearing value, lookups by binary search.

use chrono::{Datelike, NaiveDate};

/// A raw time-indexed sequence for one indicator, as handed over by the
/// provider. May contain gaps, duplicates, and out-of-order entries.
pub type RawSeries = Vec<(NaiveDate, f64)>;

/// An immutable, sorted, duplicate-free series supporting
/// "value at or before date" queries.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl NormalizedSeries {
    /// Build from a raw series.
    ///
    /// Non-finite values are dropped. For duplicate dates the later-appearing
    /// value wins (the sort is stable, so input order breaks ties).
    /// An empty input is a valid state, not an error.
    pub fn from_raw(raw: &[(NaiveDate, f64)]) -> Self {
        let mut pts: Vec<(NaiveDate, f64)> =
            raw.iter().copied().filter(|(_, v)| v.is_finite()).collect();
        pts.sort_by_key(|(d, _)| *d);

        let mut points: Vec<(NaiveDate, f64)> = Vec::with_capacity(pts.len());
        for (d, v) in pts {
            match points.last_mut() {
                Some((last_d, last_v)) if *last_d == d => *last_v = v,
                _ => points.push((d, v)),
            }
        }

        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }

    /// Most recent value at or before `asof`; series end when `asof` is `None`.
    pub fn latest(&self, asof: Option<NaiveDate>) -> Option<f64> {
        match asof {
            Some(date) => self.value_at_or_before(date),
            None => self.points.last().map(|(_, v)| *v),
        }
    }

    /// Index of the most recent observation dated at or before `asof`.
    pub fn index_at_or_before(&self, asof: NaiveDate) -> Option<usize> {
        let n = self.points.partition_point(|(d, _)| *d <= asof);
        n.checked_sub(1)
    }

    /// Most recent value dated at or before `asof` (forward-fill semantics).
    pub fn value_at_or_before(&self, asof: NaiveDate) -> Option<f64> {
        self.index_at_or_before(asof).map(|i| self.points[i].1)
    }

    /// One value per calendar month: the last observation in each month,
    /// keyed by its original observation date.
    pub fn monthly_resampled(&self) -> NormalizedSeries {
        let mut points: Vec<(NaiveDate, f64)> = Vec::new();
        for &(d, v) in &self.points {
            match points.last() {
                Some(&(last_d, _)) if month_key(last_d) == month_key(d) => {
                    *points.last_mut().unwrap() = (d, v);
                }
                _ => points.push((d, v)),
            }
        }
        NormalizedSeries { points }
    }
}

fn month_key(d: NaiveDate) -> (i32, u32) {
    (d.year(), d.month())
}
