//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while building snapshots
//! - exported to JSON/CSV
//! - rendered by the terminal report and the TUI

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Divisor that converts raw FRED units (thousands/millions) to billions of
/// dollars for the short-window delta. Part of the configuration surface, not
/// a literal buried in the calculator.
pub const UNIT_SCALE_BILLIONS: f64 = 1_000_000.0;

/// Periods back for the weekly-native YoY (one year of weekly observations).
pub const WEEKLY_YOY_LOOKBACK: usize = 52;

/// Months back for the monthly-native YoY.
pub const MONTHLY_YOY_LOOKBACK: usize = 12;

/// Minimum observations a series must have at or before the evaluation date
/// for the short-window delta to be computed at all.
pub const MIN_DELTA_OBSERVATIONS: usize = 4;

/// Daily-resolution delta lookback: 4 weeks of business days.
pub const DAILY_DELTA_LOOKBACK_BDAYS: u32 = 20;

/// Monthly-resolution delta lookback in calendar days.
///
/// Not the same approximation of "4 weeks" as the 20-business-day policy;
/// the two are kept as separate policies on purpose.
pub const MONTHLY_DELTA_LOOKBACK_DAYS: i64 = 28;

/// Default requested history window.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Windows at or below this many days are evaluated daily, above it monthly.
pub const RESOLUTION_THRESHOLD_DAYS: u32 = 365;

/// Default TTL for the raw-series cache (matches the upstream refresh cadence).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// The FRED indicators required by the signal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Federal Reserve balance sheet, weekly (WALCL).
    BalanceSheet,
    /// M2 money supply, monthly (M2SL).
    MoneySupply,
    /// Industrial production: manufacturing, monthly (IPMANSICS).
    ///
    /// Proxy for manufacturing activity; ISM PMI was removed from FRED in 2016.
    ManufacturingProduction,
    /// Treasury General Account balance (WTREGEN).
    TreasuryCashBalance,
    /// Overnight reverse repurchase agreement volume (RRPONTSYD).
    OvernightReverseRepo,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::BalanceSheet,
        Indicator::MoneySupply,
        Indicator::ManufacturingProduction,
        Indicator::TreasuryCashBalance,
        Indicator::OvernightReverseRepo,
    ];

    /// FRED series identifier.
    pub fn series_id(self) -> &'static str {
        match self {
            Indicator::BalanceSheet => "WALCL",
            Indicator::MoneySupply => "M2SL",
            Indicator::ManufacturingProduction => "IPMANSICS",
            Indicator::TreasuryCashBalance => "WTREGEN",
            Indicator::OvernightReverseRepo => "RRPONTSYD",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::BalanceSheet => "Fed Balance Sheet",
            Indicator::MoneySupply => "M2 Money Supply",
            Indicator::ManufacturingProduction => "Manufacturing Production",
            Indicator::TreasuryCashBalance => "Treasury General Account",
            Indicator::OvernightReverseRepo => "Overnight Reverse Repo",
        }
    }
}

/// Optional comparison assets plotted alongside the liquidity signal.
///
/// Overlays are presentation-only: they never feed the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverlayAsset {
    /// Bitcoin (Coinbase spot, FRED CBBTCUSD).
    Btc,
    /// S&P 500 index (FRED SP500).
    Spx,
}

impl OverlayAsset {
    pub fn series_id(self) -> &'static str {
        match self {
            OverlayAsset::Btc => "CBBTCUSD",
            OverlayAsset::Spx => "SP500",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            OverlayAsset::Btc => "BTC",
            OverlayAsset::Spx => "S&P 500",
        }
    }
}

/// Discrete liquidity state derived from the four metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "RISK-ON")]
    RiskOn,
    #[serde(rename = "TIGHT")]
    Tight,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

impl Signal {
    /// Wire/display label (matches the serialized form).
    pub fn label(self) -> &'static str {
        match self {
            Signal::RiskOn => "RISK-ON",
            Signal::Tight => "TIGHT",
            Signal::Neutral => "NEUTRAL",
        }
    }
}

/// Current-state status record keyed by [`Signal`].
///
/// `confidence` is a fixed per-signal constant, not derived from data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStatus {
    pub signal: Signal,
    pub message: String,
    pub description: String,
    pub date: NaiveDate,
    pub confidence: f64,
}

/// One evaluated point of the liquidity history.
///
/// `manufacturing_yoy` is `None` when the production series had no usable
/// observation at or before `date`; a missing reading biases the signal
/// toward NEUTRAL rather than raising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    /// Fed balance sheet YoY, percent.
    pub fed_yoy: f64,
    /// M2 YoY, percent.
    pub m2_yoy: f64,
    /// Manufacturing production YoY, percent (absent when no data).
    pub manufacturing_yoy: Option<f64>,
    /// 4-week change of TGA + RRP, billions of dollars.
    pub tga_rrp_4wk_change: f64,
    pub signal: Signal,
    /// Overlay indices, percent change from window start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btc_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spx_index: Option<f64>,
}

/// Sampling strategy selected by the size of the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Daily,
    Monthly,
}

impl Resolution {
    /// Daily for windows at or below the threshold, monthly above it.
    pub fn for_window(window_days: u32, threshold_days: u32) -> Self {
        if window_days <= threshold_days {
            Resolution::Daily
        } else {
            Resolution::Monthly
        }
    }
}

/// Parameters of one history build.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Requested lookback window in days.
    pub window_days: u32,
    /// Cutoff between daily and monthly evaluation.
    pub resolution_threshold_days: u32,
    /// Divisor converting raw source units to billions for the delta.
    pub unit_scale: f64,
    /// Overlay assets to attach to each snapshot (may be empty).
    pub overlays: Vec<OverlayAsset>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            resolution_threshold_days: RESOLUTION_THRESHOLD_DAYS,
            unit_scale: UNIT_SCALE_BILLIONS,
            overlays: Vec::new(),
        }
    }
}

impl HistoryConfig {
    pub fn resolution(&self) -> Resolution {
        Resolution::for_window(self.window_days, self.resolution_threshold_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_split_at_threshold() {
        assert_eq!(Resolution::for_window(365, 365), Resolution::Daily);
        assert_eq!(Resolution::for_window(366, 365), Resolution::Monthly);
        assert_eq!(Resolution::for_window(90, 365), Resolution::Daily);
        assert_eq!(Resolution::for_window(1825, 365), Resolution::Monthly);
    }

    #[test]
    fn signal_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Signal::RiskOn).unwrap(),
            "\"RISK-ON\""
        );
        assert_eq!(serde_json::to_string(&Signal::Tight).unwrap(), "\"TIGHT\"");
        assert_eq!(
            serde_json::to_string(&Signal::Neutral).unwrap(),
            "\"NEUTRAL\""
        );
    }
}
