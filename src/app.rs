//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches raw series (FRED or synthetic)
//! - builds the snapshot history and classifies the current state
//! - prints reports/plots
//! - writes optional exports

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::domain::HistoryConfig;
use crate::error::AppError;

pub mod pipeline;

use pipeline::DataSource;

/// Entry point for the `liq` binary.
pub fn run() -> Result<(), AppError> {
    // We want `liq` and `liq -d 90` to behave like `liq tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Status(args) => handle_status(args),
        Command::History(args) => handle_history(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_status(args: RunArgs) -> Result<(), AppError> {
    let config = history_config_from_args(&args);
    let source = data_source_from_args(&args)?;
    let (_, run) = pipeline::run(&source, &config)?;

    println!("{}", crate::report::format_status(&run.current, &run.status));

    write_exports(&args, &run)?;
    Ok(())
}

fn handle_history(args: RunArgs) -> Result<(), AppError> {
    let config = history_config_from_args(&args);
    let source = data_source_from_args(&args)?;
    let (_, run) = pipeline::run(&source, &config)?;

    println!(
        "{}",
        crate::report::format_history_table(&run.snapshots, args.last)
    );

    if !args.no_plot {
        let plot = crate::plot::render_history_plot(&run.snapshots, args.width, args.height);
        println!("{plot}");
    }

    write_exports(&args, &run)?;
    Ok(())
}

fn handle_tui(args: RunArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn write_exports(args: &RunArgs, run: &pipeline::RunOutput) -> Result<(), AppError> {
    if let Some(path) = &args.export {
        crate::io::export::write_history_csv(path, &run.snapshots)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_history_json(path, run)?;
    }
    Ok(())
}

pub fn history_config_from_args(args: &RunArgs) -> HistoryConfig {
    HistoryConfig {
        window_days: args.days,
        overlays: args.overlay.clone(),
        ..HistoryConfig::default()
    }
}

pub fn data_source_from_args(args: &RunArgs) -> Result<DataSource, AppError> {
    DataSource::new(args.sample, args.seed, Duration::from_secs(args.ttl_secs))
}

/// Rewrite argv so `liq` defaults to `liq tui`.
///
/// Rules:
/// - `liq`                      -> `liq tui`
/// - `liq -d 90 ...`            -> `liq tui -d 90 ...`
/// - `liq --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "status" | "history" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(v(&["liq"])), v(&["liq", "tui"]));
        assert_eq!(
            rewrite_args(v(&["liq", "-d", "90"])),
            v(&["liq", "tui", "-d", "90"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(v(&["liq", "status", "--sample"])),
            v(&["liq", "status", "--sample"])
        );
        assert_eq!(rewrite_args(v(&["liq", "--help"])), v(&["liq", "--help"]));
    }
}
