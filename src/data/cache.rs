//! Keyed raw-series cache with an explicit TTL and a get-or-fetch contract.
//!
//! This replaces the "global mutable dict" cache pattern: the cache is a
//! value, injected into the pipeline, with the TTL visible at construction.
//! One history build touches each series once, so many evaluation dates
//! share a single upstream fetch per indicator.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::series::RawSeries;

struct Entry {
    fetched_at: Instant,
    series: RawSeries,
}

pub struct SeriesCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached series for `key` if it is younger than the TTL,
    /// otherwise invoke `fetch` and cache the result.
    ///
    /// The map lock is held across the fetch, so concurrent callers for any
    /// key serialize behind the first fetch (coarse single-flight). A failed
    /// fetch caches nothing.
    pub fn get_or_fetch<F>(&self, key: &str, fetch: F) -> Result<RawSeries, AppError>
    where
        F: FnOnce() -> Result<RawSeries, AppError>,
    {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::runtime("Series cache lock poisoned."))?;

        if let Some(entry) = entries.get(key) {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.series.clone());
            }
        }

        let series = fetch()?;
        entries.insert(
            key.to_string(),
            Entry {
                fetched_at: Instant::now(),
                series: series.clone(),
            },
        );
        Ok(series)
    }
}
