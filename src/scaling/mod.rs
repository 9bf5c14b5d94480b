//! Scorecard scaling.
//!
//! Responsibilities:
//!
//! - validate the scaling configuration (`validation`)
//! - map raw points onto the target range (`points`)
//! - rebalance points into intercept-based form (`intercept`)

pub mod intercept;
pub mod points;
pub mod validation;

pub use intercept::*;
pub use points::*;
pub use validation::*;
