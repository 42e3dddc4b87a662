//! Command-line parsing for the liquidity signal engine.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the series/metric code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_CACHE_TTL_SECS, DEFAULT_WINDOW_DAYS, OverlayAsset};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "liq", version, about = "FRED Liquidity Signal Engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current snapshot, signal status, and derived metrics.
    Status(RunArgs),
    /// Print the historical snapshot table, terminal plot, and exports.
    History(RunArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying pipeline as `liq history`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(RunArgs),
}

/// Common options for all commands.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Lookback window in days (windows above 365 evaluate monthly).
    #[arg(short = 'd', long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub days: u32,

    /// Overlay asset to attach to each snapshot (repeatable).
    #[arg(long, value_enum)]
    pub overlay: Vec<OverlayAsset>,

    /// Use deterministic synthetic data instead of FRED (no API key needed).
    #[arg(long)]
    pub sample: bool,

    /// Seed for the synthetic data generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Raw-series cache TTL in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub ttl_secs: u64,

    /// Number of trailing history rows to print.
    #[arg(long, default_value_t = 12)]
    pub last: usize,

    /// Disable the terminal plot (rendered by default with `history`).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the snapshot history to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the snapshot history plus signal status to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}
