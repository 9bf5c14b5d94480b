//! Linear estimator evaluation.
//!
//! The model is kept as plain data plus small pure functions so that the
//! scorecard can reproduce the estimator's outputs without refitting it.

pub mod linear;

pub use linear::*;
