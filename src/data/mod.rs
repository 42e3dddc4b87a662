//! Raw-series providers and the cache boundary.

pub mod cache;
pub mod fred;
pub mod sample;

pub use cache::SeriesCache;
pub use fred::FredClient;

use std::collections::HashMap;

use crate::domain::{Indicator, OverlayAsset};
use crate::series::RawSeries;

/// All raw series one history build needs: the required indicators plus any
/// requested overlays. Overlays may be absent (fetch degraded gracefully).
#[derive(Debug, Clone, Default)]
pub struct SeriesBundle {
    pub indicators: HashMap<Indicator, RawSeries>,
    pub overlays: HashMap<OverlayAsset, RawSeries>,
}

impl SeriesBundle {
    pub fn indicator(&self, indicator: Indicator) -> &[(chrono::NaiveDate, f64)] {
        self.indicators
            .get(&indicator)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    pub fn overlay(&self, asset: OverlayAsset) -> Option<&[(chrono::NaiveDate, f64)]> {
        self.overlays.get(&asset).map(|s| s.as_slice())
    }
}
