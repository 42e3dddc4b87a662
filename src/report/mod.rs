//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the series/metric code stays clean and testable
//! - output changes are localized (important for snapshot tests)

mod format;

pub use format::{format_history_table, format_status};
