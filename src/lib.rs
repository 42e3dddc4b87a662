//! `liquidity-pulse` library crate.
//!
//! The binary (`liq`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future daemon/API front-ends, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod history;
pub mod io;
pub mod metrics;
pub mod plot;
pub mod report;
pub mod series;
pub mod signal;
pub mod tui;
