//! Liquidity signal classification.
//!
//! A stateless mapping from four derived metrics to one of three states,
//! with a fixed precedence: RISK-ON is checked first, then TIGHT, else
//! NEUTRAL. Manufacturing must be a defined reading for either non-neutral
//! state; a missing reading always lands on NEUTRAL.

use chrono::NaiveDate;

use crate::domain::{Signal, SignalStatus};

/// Classify one point in time.
///
/// RISK-ON: fed YoY > 0, 4-week TGA+RRP change < 0 (liquidity being
/// released), M2 YoY > 0, manufacturing YoY present and >= 0.
///
/// TIGHT: fed YoY < −3 and manufacturing YoY present and <= −3.
pub fn classify(
    fed_yoy: f64,
    m2_yoy: f64,
    manufacturing_yoy: Option<f64>,
    tga_rrp_4wk_change: f64,
) -> Signal {
    let risk_on = fed_yoy > 0.0
        && tga_rrp_4wk_change < 0.0
        && m2_yoy > 0.0
        && manufacturing_yoy.is_some_and(|m| m >= 0.0);
    if risk_on {
        return Signal::RiskOn;
    }

    let tight = fed_yoy < -3.0 && manufacturing_yoy.is_some_and(|m| m <= -3.0);
    if tight {
        return Signal::Tight;
    }

    Signal::Neutral
}

/// Status record for a signal: fixed message, description, and confidence.
///
/// The confidence values are static per signal, not derived from data.
pub fn signal_status(signal: Signal, date: NaiveDate) -> SignalStatus {
    let (message, description, confidence) = match signal {
        Signal::RiskOn => (
            "RISK-ON PROTOCOL",
            "Liquidity conditions favor risk assets",
            0.95,
        ),
        Signal::Tight => ("TIGHT LIQUIDITY", "Restrictive conditions detected", 0.90),
        Signal::Neutral => ("NEUTRAL CONDITIONS", "Balanced liquidity profile", 0.85),
    };

    SignalStatus {
        signal,
        message: message.to_string(),
        description: description.to_string(),
        date,
        confidence,
    }
}
