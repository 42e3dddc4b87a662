//! FRED API integration for the liquidity indicator series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::{SeriesBundle, cache::SeriesCache};
use crate::domain::{Indicator, OverlayAsset};
use crate::error::AppError;
use crate::series::RawSeries;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 10000;

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::config("Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch the required indicators and requested overlays, through the cache.
    ///
    /// A failed indicator fetch is fatal for the request. A failed overlay
    /// fetch degrades to absence: the run continues without that overlay.
    pub fn fetch_bundle(
        &self,
        cache: &SeriesCache,
        overlays: &[OverlayAsset],
    ) -> Result<SeriesBundle, AppError> {
        let mut bundle = SeriesBundle::default();

        for indicator in Indicator::ALL {
            let id = indicator.series_id();
            let series = cache.get_or_fetch(id, || self.fetch_series(id))?;
            bundle.indicators.insert(indicator, series);
        }

        for &asset in overlays {
            let id = asset.series_id();
            match cache.get_or_fetch(id, || self.fetch_series(id)) {
                Ok(series) => {
                    bundle.overlays.insert(asset, series);
                }
                Err(err) => {
                    eprintln!("warning: overlay {id} unavailable: {err}");
                }
            }
        }

        Ok(bundle)
    }

    /// Fetch one full series by FRED series id.
    ///
    /// Missing observations (value `"."`) are skipped; no ordering or
    /// uniqueness is assumed here — normalization happens downstream.
    pub fn fetch_series(&self, series_id: &str) -> Result<RawSeries, AppError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("limit", &OBS_LIMIT.to_string()),
            ])
            .send()
            .map_err(|e| AppError::runtime(format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "FRED request for {series_id} failed with status {}.",
                resp.status()
            )));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse FRED response: {e}")))?;

        let mut out = Vec::new();
        for obs in body.observations {
            let value = match parse_value(&obs.value) {
                Some(v) => v,
                None => continue,
            };
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                .map_err(|e| AppError::data(format!("Invalid FRED date '{}': {e}", obs.date)))?;
            out.push((date, value));
        }

        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_handles_fred_missing_marker() {
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value(" 7234.5 "), Some(7234.5));
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("not-a-number"), None);
    }
}
