//! Derived-metric calculators (YoY and short-window delta).
//!
//! Policy shared by every calculator here: insufficient history, a missing
//! observation, or a zero denominator resolves to `0.0`. Callers never see
//! NaN from this layer.

pub mod delta;
pub mod yoy;

pub use delta::short_window_delta;
pub use yoy::{monthly_yoy, monthly_yoy_from_resampled, weekly_yoy};
