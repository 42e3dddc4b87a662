//! Plain-text report formatting for `liq status` and `liq history`.

use crate::domain::{SignalStatus, Snapshot};

/// Format the current-state banner with the derived metrics underneath.
pub fn format_status(current: &Snapshot, status: &SignalStatus) -> String {
    let mut out = String::new();

    out.push_str("=== liq - FRED Liquidity Signal Engine ===\n");
    out.push_str(&format!("As-of: {}\n", status.date));
    out.push_str(&format!("Signal: {}\n", status.message));
    out.push_str(&format!("  {}\n", status.description));
    out.push_str(&format!("  Confidence: {:.2}\n", status.confidence));

    out.push_str("\nMetrics:\n");
    out.push_str(&format!(
        "  Fed balance sheet YoY : {:>8.2}%\n",
        current.fed_yoy
    ));
    out.push_str(&format!(
        "  M2 money supply YoY   : {:>8.2}%\n",
        current.m2_yoy
    ));
    out.push_str(&format!(
        "  Manufacturing YoY     : {:>9}\n",
        fmt_opt_pct(current.manufacturing_yoy)
    ));
    out.push_str(&format!(
        "  TGA+RRP 4-week change : {:>8.2}B\n",
        current.tga_rrp_4wk_change
    ));

    if current.btc_index.is_some() || current.spx_index.is_some() {
        out.push_str("\nOverlays (since window start):\n");
        if let Some(v) = current.btc_index {
            out.push_str(&format!("  BTC     : {v:>8.2}%\n"));
        }
        if let Some(v) = current.spx_index {
            out.push_str(&format!("  S&P 500 : {v:>8.2}%\n"));
        }
    }

    out
}

/// Format the trailing `last` snapshots as a fixed-width table.
pub fn format_history_table(snapshots: &[Snapshot], last: usize) -> String {
    let mut out = String::new();

    let has_btc = snapshots.iter().any(|s| s.btc_index.is_some());
    let has_spx = snapshots.iter().any(|s| s.spx_index.is_some());

    let mut header = format!(
        "{:<12} {:>9} {:>9} {:>9} {:>10} {:<8}",
        "date", "fed_yoy", "m2_yoy", "mfg_yoy", "tga_rrp_d", "signal"
    );
    let mut rule = format!(
        "{:-<12} {:-<9} {:-<9} {:-<9} {:-<10} {:-<8}",
        "", "", "", "", "", ""
    );
    if has_btc {
        header.push_str(&format!(" {:>9}", "btc"));
        rule.push_str(&format!(" {:-<9}", ""));
    }
    if has_spx {
        header.push_str(&format!(" {:>9}", "spx"));
        rule.push_str(&format!(" {:-<9}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    let skip = snapshots.len().saturating_sub(last);
    for s in snapshots.iter().skip(skip) {
        let mut row = format!(
            "{:<12} {:>9.2} {:>9.2} {:>9} {:>10.2} {:<8}",
            s.date.to_string(),
            s.fed_yoy,
            s.m2_yoy,
            fmt_opt_pct(s.manufacturing_yoy),
            s.tga_rrp_4wk_change,
            s.signal.label(),
        );
        if has_btc {
            row.push_str(&format!(" {:>9}", fmt_opt_pct(s.btc_index)));
        }
        if has_spx {
            row.push_str(&format!(" {:>9}", fmt_opt_pct(s.spx_index)));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_opt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}
