//! Shared domain types and constants.

mod types;

pub use types::*;
