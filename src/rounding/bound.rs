//! Bound-preserving rounding.
//!
//! Rounding min/max-scaled points to the nearest integer can move the lowest or
//! highest achievable total score off the configured bound. The problem solved
//! here is:
//!
//! ```text
//! minimize   Σ |x_i - p_i|                      x_i integer
//! subject to x[argmin_v] <= x_j <= x[argmax_v]   for every bin j of variable v
//!            Σ_v x[argmin_v] = round(Σ_v p[argmin_v])
//!            Σ_v x[argmax_v] = round(Σ_v p[argmax_v])
//! ```
//!
//! The rounder is a capability: `build` snapshots the table into a
//! `RoundingModel`, `solve` returns a status and, when usable, the integer points.
//! Any backend (MIP, CP, heuristic) can sit behind `BoundPreservingRounder`.

use serde::{Deserialize, Serialize};

use crate::domain::ScorecardTable;
use crate::error::ScorecardError;

/// Outcome vocabulary shared by all rounding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingStatus {
    Optimal,
    Feasible,
    Infeasible,
    Error,
}

impl RoundingStatus {
    /// Whether a solution with this status may be used.
    pub fn is_usable(self) -> bool {
        matches!(self, RoundingStatus::Optimal | RoundingStatus::Feasible)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundingStatus::Optimal => "OPTIMAL",
            RoundingStatus::Feasible => "FEASIBLE",
            RoundingStatus::Infeasible => "INFEASIBLE",
            RoundingStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for RoundingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowest and highest bin of one variable (row indices into the points vector).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremeBins {
    pub indices: Vec<usize>,
    pub argmin: usize,
    pub argmax: usize,
}

impl ExtremeBins {
    /// Minimum and maximum are the same bin (single-bin or flat variable).
    pub fn is_coupled(&self) -> bool {
        self.argmin == self.argmax
    }
}

/// Snapshot of a scorecard handed to a rounding backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundingModel {
    pub points: Vec<f64>,
    pub variables: Vec<ExtremeBins>,
    /// Integer target for the sum of per-variable minima.
    pub min_target: f64,
    /// Integer target for the sum of per-variable maxima.
    pub max_target: f64,
}

impl RoundingModel {
    pub fn from_table(table: &ScorecardTable) -> Result<Self, ScorecardError> {
        let points = table.points();
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(ScorecardError::input(format!(
                "Cannot round non-finite scorecard point {bad}."
            )));
        }

        let mut variables = Vec::with_capacity(table.groups().len());
        for group in table.groups().iter() {
            let Some(&first) = group.indices.first() else {
                return Err(ScorecardError::input(format!(
                    "Variable '{}' has no bins.",
                    group.name
                )));
            };
            // First occurrence wins on ties.
            let mut argmin = first;
            let mut argmax = first;
            for &i in &group.indices {
                if points[i] < points[argmin] {
                    argmin = i;
                }
                if points[i] > points[argmax] {
                    argmax = i;
                }
            }
            variables.push(ExtremeBins {
                indices: group.indices.clone(),
                argmin,
                argmax,
            });
        }

        let min_sum: f64 = variables.iter().map(|v| points[v.argmin]).sum();
        let max_sum: f64 = variables.iter().map(|v| points[v.argmax]).sum();

        Ok(Self {
            points,
            variables,
            min_target: min_sum.round_ties_even(),
            max_target: max_sum.round_ties_even(),
        })
    }
}

/// What a backend returns from `solve`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundingSolution {
    pub status: RoundingStatus,
    /// Present only when `status.is_usable()`.
    pub values: Option<Vec<f64>>,
}

impl RoundingSolution {
    pub fn failed(status: RoundingStatus) -> Self {
        Self { status, values: None }
    }
}

/// Capability interface for bound-preserving rounding backends.
pub trait BoundPreservingRounder: Send + Sync {
    fn build(&self, table: &ScorecardTable) -> Result<RoundingModel, ScorecardError> {
        RoundingModel::from_table(table)
    }

    fn solve(&self, model: &RoundingModel) -> RoundingSolution;
}

/// Default backend: nearest-integer start plus cheapest feasible unit moves.
///
/// With separable convex costs and one sum constraint per pass, taking the
/// cheapest unit move each step is optimal as long as no move has to carry
/// other bins along and no variable ties both sums together. When either
/// happens the result is still feasible and is reported as `Feasible`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBoundRounder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

struct Move {
    var: usize,
    cost: f64,
    /// Other bins of the variable shifted along with the extreme one.
    carried: Vec<usize>,
}

impl GreedyBoundRounder {
    fn adjust(
        &self,
        model: &RoundingModel,
        x: &mut [f64],
        which: Extreme,
        constrained: &mut bool,
    ) -> Result<(), RoundingStatus> {
        let target = match which {
            Extreme::Min => model.min_target,
            Extreme::Max => model.max_target,
        };
        let current: f64 = model
            .variables
            .iter()
            .map(|v| x[extreme_index(v, which)])
            .sum();
        let mut deficit = (target - current).round() as i64;

        while deficit != 0 {
            let step = deficit.signum() as f64;
            let mut best: Option<Move> = None;

            for (var, bins) in model.variables.iter().enumerate() {
                // Coupled variables also move the minimum sum; only the min pass may touch them.
                if which == Extreme::Max && bins.is_coupled() {
                    continue;
                }
                let Some((carried, cost)) = plan_move(model, bins, x, which, step) else {
                    *constrained = true;
                    continue;
                };
                let better = match &best {
                    None => true,
                    Some(b) => cost < b.cost,
                };
                if better {
                    best = Some(Move { var, cost, carried });
                }
            }

            let Some(chosen) = best else {
                return Err(RoundingStatus::Infeasible);
            };
            let bins = &model.variables[chosen.var];
            if bins.is_coupled() || !chosen.carried.is_empty() {
                *constrained = true;
            }
            let next = x[extreme_index(bins, which)] + step;
            x[extreme_index(bins, which)] = next;
            for &j in &chosen.carried {
                x[j] = next;
            }
            deficit -= deficit.signum();
        }

        Ok(())
    }
}

impl BoundPreservingRounder for GreedyBoundRounder {
    fn solve(&self, model: &RoundingModel) -> RoundingSolution {
        let mut x: Vec<f64> = model.points.iter().map(|p| p.round_ties_even()).collect();
        let mut constrained = false;

        for which in [Extreme::Min, Extreme::Max] {
            if let Err(status) = self.adjust(model, &mut x, which, &mut constrained) {
                return RoundingSolution::failed(status);
            }
        }

        let min_sum: f64 = model.variables.iter().map(|v| x[v.argmin]).sum();
        let max_sum: f64 = model.variables.iter().map(|v| x[v.argmax]).sum();
        if min_sum != model.min_target || max_sum != model.max_target {
            return RoundingSolution::failed(RoundingStatus::Error);
        }

        let status = if constrained {
            RoundingStatus::Feasible
        } else {
            RoundingStatus::Optimal
        };
        RoundingSolution {
            status,
            values: Some(x),
        }
    }
}

fn extreme_index(bins: &ExtremeBins, which: Extreme) -> usize {
    match which {
        Extreme::Min => bins.argmin,
        Extreme::Max => bins.argmax,
    }
}

/// Plan a unit move of the `which` extreme of one variable.
///
/// Bins the move would cross are carried to the same value, so the extreme stays
/// an extreme. Returns the carried bins and the change in `Σ |x - p|`, or `None`
/// when the max pass would have to carry the variable's minimum bin.
fn plan_move(
    model: &RoundingModel,
    bins: &ExtremeBins,
    x: &[f64],
    which: Extreme,
    step: f64,
) -> Option<(Vec<usize>, f64)> {
    let i = extreme_index(bins, which);
    let next = x[i] + step;
    let crossed = |j: usize| match which {
        Extreme::Min => x[j] < next,
        Extreme::Max => x[j] > next,
    };
    let carried: Vec<usize> = bins
        .indices
        .iter()
        .copied()
        .filter(|&j| j != i && crossed(j))
        .collect();
    if which == Extreme::Max && carried.contains(&bins.argmin) {
        return None;
    }

    let delta = |j: usize| {
        let p = model.points[j];
        (next - p).abs() - (x[j] - p).abs()
    };
    let cost = delta(i) + carried.iter().map(|&j| delta(j)).sum::<f64>();
    Some((carried, cost))
}
