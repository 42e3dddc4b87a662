//! Export the snapshot history to CSV and JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts, so the CSV columns are flat and the JSON mirrors the in-memory
//! types directly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::pipeline::RunOutput;
use crate::domain::{SignalStatus, Snapshot};
use crate::error::AppError;

/// On-disk JSON layout: current status first, then the full history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFile {
    pub status: SignalStatus,
    pub snapshots: Vec<Snapshot>,
}

/// Write the snapshot history to a CSV file.
pub fn write_history_csv(path: &Path, snapshots: &[Snapshot]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(
        file,
        "date,fed_yoy,m2_yoy,manufacturing_yoy,tga_rrp_4wk_change,signal,btc_index,spx_index"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for s in snapshots {
        writeln!(file, "{}", csv_row(s))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the status plus snapshot history to a pretty-printed JSON file.
pub fn write_history_json(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = HistoryFile {
        status: run.status.clone(),
        snapshots: run.snapshots.clone(),
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| AppError::new(2, format!("Failed to serialize history JSON: {e}")))?;

    std::fs::write(path, json).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to write export JSON '{}': {e}", path.display()),
        )
    })
}

/// One CSV row; optional fields are left empty when absent.
fn csv_row(s: &Snapshot) -> String {
    format!(
        "{},{:.6},{:.6},{},{:.6},{},{},{}",
        s.date,
        s.fed_yoy,
        s.m2_yoy,
        fmt_opt(s.manufacturing_yoy),
        s.tga_rrp_4wk_change,
        s.signal.label(),
        fmt_opt(s.btc_index),
        fmt_opt(s.spx_index),
    )
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.6}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use crate::signal::signal_status;
    use chrono::NaiveDate;

    fn snapshot() -> Snapshot {
        Snapshot {
            date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            fed_yoy: 1.25,
            m2_yoy: 2.5,
            manufacturing_yoy: None,
            tga_rrp_4wk_change: -40.0,
            signal: Signal::Neutral,
            btc_index: Some(12.0),
            spx_index: None,
        }
    }

    #[test]
    fn csv_row_leaves_missing_fields_empty() {
        let row = csv_row(&snapshot());
        assert_eq!(
            row,
            "2025-04-30,1.250000,2.500000,,-40.000000,NEUTRAL,12.000000,"
        );
    }

    #[test]
    fn history_file_round_trips_through_json() {
        let snapshots = vec![snapshot()];
        let status = signal_status(Signal::Neutral, snapshots[0].date);
        let file = HistoryFile {
            status,
            snapshots: snapshots.clone(),
        };

        let json = serde_json::to_string(&file).unwrap();
        // Wire labels, not variant names.
        assert!(json.contains("\"NEUTRAL\""));
        // Absent overlays are omitted entirely.
        assert!(!json.contains("spx_index"));

        let back: HistoryFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.snapshots, snapshots);
        assert_eq!(back.status, file.status);
    }
}
