//! Integer rounding of scorecard points.
//!
//! - no scaling / `pdo_odds`: nearest integer, ties to even
//! - `min_max`: a bound-preserving backend; if it does not return an OPTIMAL or
//!   FEASIBLE solution we warn and fall back to nearest-integer rounding. The
//!   fallback keeps the fit alive but no longer guarantees the exact bounds.

use serde::{Deserialize, Serialize};

use crate::domain::{ScalingMethod, ScorecardTable};
use crate::rounding::bound::{BoundPreservingRounder, RoundingStatus};

/// How the final integer points were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMethod {
    NearestInteger,
    BoundPreserving,
    /// Bound-preserving rounding failed; nearest integer was used instead.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundingOutcome {
    pub status: RoundingStatus,
    pub method: RoundingMethod,
    pub points: Vec<f64>,
}

impl RoundingOutcome {
    /// Human-readable status line for logs and reports.
    pub fn describe(&self) -> String {
        self.summary().describe()
    }

    pub fn summary(&self) -> RoundingSummary {
        RoundingSummary {
            status: self.status,
            method: self.method,
        }
    }
}

/// Status and method of a rounding run, without the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingSummary {
    pub status: RoundingStatus,
    pub method: RoundingMethod,
}

impl RoundingSummary {
    pub fn describe(&self) -> String {
        match self.method {
            RoundingMethod::NearestInteger => format!("{} (nearest integer)", self.status),
            RoundingMethod::BoundPreserving => format!("{} (bound-preserving)", self.status),
            RoundingMethod::Fallback => {
                format!("{} (bound-preserving failed, nearest integer used)", self.status)
            }
        }
    }
}

/// Round every point to the nearest integer, ties to even.
pub fn round_nearest(points: &[f64]) -> Vec<f64> {
    points.iter().map(|p| p.round_ties_even()).collect()
}

pub struct IntegerRounder<'a> {
    backend: &'a dyn BoundPreservingRounder,
}

impl<'a> IntegerRounder<'a> {
    pub fn new(backend: &'a dyn BoundPreservingRounder) -> Self {
        Self { backend }
    }

    pub fn round(&self, table: &ScorecardTable, method: &ScalingMethod) -> RoundingOutcome {
        match method {
            ScalingMethod::None | ScalingMethod::PdoOdds { .. } => RoundingOutcome {
                status: RoundingStatus::Optimal,
                method: RoundingMethod::NearestInteger,
                points: round_nearest(&table.points()),
            },
            ScalingMethod::MinMax { .. } => self.round_bounded(table),
        }
    }

    fn round_bounded(&self, table: &ScorecardTable) -> RoundingOutcome {
        let solution = match self.backend.build(table) {
            Ok(model) => self.backend.solve(&model),
            Err(err) => {
                log::debug!("bound-preserving model build failed: {err}");
                return self.fallback(table, RoundingStatus::Error);
            }
        };

        match solution.values {
            Some(values) if solution.status.is_usable() && values.len() == table.len() => {
                log::info!("Bound-preserving rounding status: {}", solution.status);
                RoundingOutcome {
                    status: solution.status,
                    method: RoundingMethod::BoundPreserving,
                    points: values,
                }
            }
            Some(_) if solution.status.is_usable() => {
                self.fallback(table, RoundingStatus::Error)
            }
            _ => self.fallback(table, solution.status),
        }
    }

    fn fallback(&self, table: &ScorecardTable, status: RoundingStatus) -> RoundingOutcome {
        log::warn!(
            "Bound-preserving rounding failed (status {status}); nearest integer used instead."
        );
        RoundingOutcome {
            status,
            method: RoundingMethod::Fallback,
            points: round_nearest(&table.points()),
        }
    }
}
