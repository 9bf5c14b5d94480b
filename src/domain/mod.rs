//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model input (`ModelInput`, `BinTable`, `Bin`) and configuration
//!   (`ScorecardConfig`, `ScalingMethod`)
//! - scorecard rows and their per-variable grouping (`ScorecardTable`)
//! - observations to score (`Observation`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
