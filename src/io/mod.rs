//! Input/output helpers.
//!
//! - snapshot history exports (CSV/JSON) (`export`)

pub mod export;

pub use export::*;
