//! `scorecard-points` library crate.
//!
//! Turns a binned linear model (binning tables + coefficients) into a points
//! scorecard: raw points, optional scaling (`pdo_odds`, `min_max`), optional
//! intercept-based rebalancing and optional integer rounding.
//!
//! The binary (`scorecard`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the numeric stages are reusable on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod rounding;
pub mod scaling;
pub mod scorecard;
