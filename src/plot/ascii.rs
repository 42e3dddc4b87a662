//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - Fed balance sheet YoY: `F` line
//! - M2 YoY: `M` line
//! - manufacturing YoY: `P` line (gaps where the reading is missing)
//! - RISK-ON snapshots: `.` column shading

use crate::domain::{Signal, Snapshot};

/// Render the YoY metric history as a character grid.
pub fn render_history_plot(snapshots: &[Snapshot], width: usize, height: usize) -> String {
    if snapshots.is_empty() {
        return "Plot: no snapshots in window\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = yoy_range(snapshots).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Shade RISK-ON columns first so the metric lines draw over them.
    shade_risk_on(&mut grid, snapshots, width);

    draw_series(
        &mut grid,
        snapshots,
        |s| Some(s.fed_yoy),
        y_min,
        y_max,
        'F',
    );
    draw_series(&mut grid, snapshots, |s| Some(s.m2_yoy), y_min, y_max, 'M');
    draw_series(
        &mut grid,
        snapshots,
        |s| s.manufacturing_yoy,
        y_min,
        y_max,
        'P',
    );

    let first = snapshots[0].date;
    let last = snapshots[snapshots.len() - 1].date;
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {first}..{last} | yoy=[{y_min:.2}, {y_max:.2}]% | F=fed M=m2 P=mfg .=risk-on\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn yoy_range(snapshots: &[Snapshot]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in snapshots {
        for v in [Some(s.fed_yoy), Some(s.m2_yoy), s.manufacturing_yoy]
            .into_iter()
            .flatten()
        {
            min_y = min_y.min(v);
            max_y = max_y.max(v);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn shade_risk_on(grid: &mut [Vec<char>], snapshots: &[Snapshot], width: usize) {
    let n = snapshots.len();
    let mut i = 0;
    while i < n {
        if snapshots[i].signal != Signal::RiskOn {
            i += 1;
            continue;
        }
        // Extend over the whole consecutive RISK-ON run.
        let mut j = i;
        while j + 1 < n && snapshots[j + 1].signal == Signal::RiskOn {
            j += 1;
        }
        let x0 = map_x(i, n, width);
        let x1 = map_x(j, n, width);
        for row in grid.iter_mut() {
            for cell in row.iter_mut().take(x1 + 1).skip(x0) {
                *cell = '.';
            }
        }
        i = j + 1;
    }
}

fn draw_series<F>(
    grid: &mut [Vec<char>],
    snapshots: &[Snapshot],
    value: F,
    y_min: f64,
    y_max: f64,
    ch: char,
) where
    F: Fn(&Snapshot) -> Option<f64>,
{
    let n = snapshots.len();
    let height = grid.len();
    let width = grid[0].len();

    let mut prev: Option<(usize, usize)> = None;
    for (i, s) in snapshots.iter().enumerate() {
        let Some(v) = value(s) else {
            // Break the polyline across missing readings.
            prev = None;
            continue;
        };
        let x = map_x(i, n, width);
        let y = map_y(v, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else if matches!(grid[y][x], ' ' | '.') {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = (i as f64 / (n as f64 - 1.0)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Writes only into blank or shaded
/// cells so earlier series stay visible at crossings.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && matches!(grid[y0 as usize][x0 as usize], ' ' | '.')
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snap(day: u32, signal: Signal, mfg: Option<f64>) -> Snapshot {
        Snapshot {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            fed_yoy: 10.0,
            m2_yoy: 5.0,
            manufacturing_yoy: mfg,
            tga_rrp_4wk_change: 0.0,
            signal,
            btc_index: None,
            spx_index: None,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let snapshots = vec![
            snap(1, Signal::Neutral, Some(0.0)),
            snap(2, Signal::RiskOn, Some(0.0)),
        ];

        let txt = render_history_plot(&snapshots, 10, 5);
        let expected = concat!(
            "Plot: 2025-03-01..2025-03-02 | yoy=[-0.50, 10.50]% | F=fed M=m2 P=mfg .=risk-on\n",
            "FFFFFFFFFF\n",
            "         .\n",
            "MMMMMMMMMM\n",
            "         .\n",
            "PPPPPPPPPP\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn missing_manufacturing_breaks_the_line() {
        let snapshots = vec![
            snap(1, Signal::Neutral, Some(0.0)),
            snap(2, Signal::Neutral, None),
            snap(3, Signal::Neutral, Some(0.0)),
        ];
        let txt = render_history_plot(&snapshots, 11, 5);
        // Bottom row: isolated P at both ends, gap in the middle.
        let bottom = txt.lines().last().unwrap();
        assert!(bottom.starts_with('P'));
        assert!(bottom.ends_with('P'));
        assert!(bottom[1..bottom.len() - 1].chars().all(|c| c == ' '));
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let txt = render_history_plot(&[], 80, 20);
        assert_eq!(txt, "Plot: no snapshots in window\n");
    }
}
