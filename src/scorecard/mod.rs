//! Scorecard orchestration.
//!
//! Responsibilities:
//!
//! - turn binning tables + coefficients into raw points and run the
//!   scale → rebalance → round stages (`assembler`)
//! - hold a fitted scorecard and answer queries on it (`estimator`)
//! - score observations (`score`)

pub mod assembler;
pub mod estimator;
pub mod score;

pub use assembler::*;
pub use estimator::*;
pub use score::*;
