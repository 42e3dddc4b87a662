//! Ratatui-based terminal UI.
//!
//! The TUI shows the current signal banner, the derived metrics, and the
//! YoY history chart. The raw bundle is fetched once per refresh; window
//! changes recompute from the cached bundle without touching the network.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{self, DataSource, RunOutput};
use crate::cli::RunArgs;
use crate::data::SeriesBundle;
use crate::domain::{HistoryConfig, Signal, Snapshot};
use crate::error::AppError;

mod chart;

use chart::LiquidityChart;

/// Window adjustment step for Left/Right keys.
const WINDOW_STEP_DAYS: u32 = 30;
const MIN_WINDOW_DAYS: u32 = 30;

/// Start the TUI.
pub fn run(args: RunArgs) -> Result<(), AppError> {
    let source = crate::app::data_source_from_args(&args)?;
    let config = crate::app::history_config_from_args(&args);

    // Fetch before entering the alternate screen so key/network errors print
    // as normal CLI errors instead of corrupting the terminal.
    let bundle = source.fetch(&config.overlays)?;
    let run = pipeline::run_with_bundle(&bundle, &config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App {
        source,
        config,
        bundle,
        run,
        status: "Ready.".to_string(),
    };
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                4,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    source: DataSource,
    config: HistoryConfig,
    bundle: SeriesBundle,
    run: RunOutput,
    status: String,
}

impl App {
    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => match self.source.fetch(&self.config.overlays) {
                Ok(bundle) => {
                    self.bundle = bundle;
                    self.recompute();
                    self.status = "Refreshed raw series.".to_string();
                }
                Err(err) => {
                    self.status = format!("Refresh failed: {err}");
                }
            },
            KeyCode::Left => {
                self.config.window_days = self
                    .config
                    .window_days
                    .saturating_sub(WINDOW_STEP_DAYS)
                    .max(MIN_WINDOW_DAYS);
                self.recompute();
            }
            KeyCode::Right => {
                self.config.window_days = self.config.window_days.saturating_add(WINDOW_STEP_DAYS);
                self.recompute();
            }
            _ => {}
        }
        false
    }

    fn recompute(&mut self) {
        match pipeline::run_with_bundle(&self.bundle, &self.config) {
            Ok(run) => {
                self.run = run;
                self.status = format!(
                    "window: {}d ({:?})",
                    self.config.window_days,
                    self.config.resolution()
                );
            }
            Err(err) => {
                self.status = format!("Recompute failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let current = &self.run.current;
        let status = &self.run.status;

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("liq", Style::default().fg(Color::Cyan)),
            Span::raw(" — FRED liquidity signal"),
        ]));
        lines.push(Line::from(Span::styled(
            format!("{} — {}", status.message, status.description),
            Style::default()
                .fg(signal_color(status.signal))
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "as-of: {} | confidence: {:.2} | window: {}d ({:?})",
                status.date,
                status.confidence,
                self.config.window_days,
                self.config.resolution(),
            ),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "fed yoy: {:.2}% | m2 yoy: {:.2}% | mfg yoy: {} | tga+rrp 4wk: {:.2}B",
                current.fed_yoy,
                current.m2_yoy,
                current
                    .manufacturing_yoy
                    .map(|v| format!("{v:.2}%"))
                    .unwrap_or_else(|| "n/a".to_string()),
                current.tga_rrp_4wk_change,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("YoY metrics (green=fed, cyan=m2, orange=mfg)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.run.snapshots.is_empty() {
            let msg = Paragraph::new("No snapshots in window.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let (fed, m2, manufacturing, x_bounds, y_bounds) = chart_series(&self.run.snapshots);
        let widget = LiquidityChart {
            fed: &fed,
            m2: &m2,
            manufacturing: &manufacturing,
            x_bounds,
            y_bounds,
            x_label: "days since window start",
            y_label: "yoy (%)",
            fmt_x: fmt_axis_days,
            fmt_y: fmt_axis_pct,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ window ±30d  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn signal_color(signal: Signal) -> Color {
    match signal {
        Signal::RiskOn => Color::Green,
        Signal::Tight => Color::Red,
        Signal::Neutral => Color::Yellow,
    }
}

/// Build chart series for Plotters. X is days since the first snapshot.
#[allow(clippy::type_complexity)]
fn chart_series(
    snapshots: &[Snapshot],
) -> (
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    Vec<Vec<(f64, f64)>>,
    [f64; 2],
    [f64; 2],
) {
    let start = snapshots[0].date;
    let x_of = |s: &Snapshot| (s.date - start).num_days() as f64;

    let fed: Vec<(f64, f64)> = snapshots.iter().map(|s| (x_of(s), s.fed_yoy)).collect();
    let m2: Vec<(f64, f64)> = snapshots.iter().map(|s| (x_of(s), s.m2_yoy)).collect();

    // Contiguous runs of present manufacturing readings.
    let mut manufacturing: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut segment: Vec<(f64, f64)> = Vec::new();
    for s in snapshots {
        match s.manufacturing_yoy {
            Some(v) => segment.push((x_of(s), v)),
            None => {
                if !segment.is_empty() {
                    manufacturing.push(std::mem::take(&mut segment));
                }
            }
        }
    }
    if !segment.is_empty() {
        manufacturing.push(segment);
    }

    let x_max = fed.last().map(|&(x, _)| x).unwrap_or(1.0).max(1.0);
    let x_bounds = [0.0, x_max];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in fed.iter().chain(m2.iter()).chain(manufacturing.iter().flatten()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (fed, m2, manufacturing, x_bounds, y_bounds)
}

fn fmt_axis_days(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_pct(v: f64) -> String {
    format!("{v:.1}")
}
