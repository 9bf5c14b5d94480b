//! Integer rounding of scorecard points.
//!
//! - `rounder`: nearest-integer rounding and the fallback policy
//! - `bound`: the bound-preserving backend interface and the default backend

pub mod bound;
pub mod rounder;

pub use bound::*;
pub use rounder::*;
