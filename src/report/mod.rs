//! Reporting utilities: tables, fit information and score summaries.

pub mod format;

pub use format::*;
