//! Scorecard assembly.
//!
//! Fixed stage order for one fit:
//!
//! 1. raw points: `statistic × coefficient` per bin
//! 2. scaling (if a method is configured)
//! 3. intercept-based rebalancing (if enabled)
//! 4. rounding (if enabled)
//!
//! With `min_max` and rebalancing, the intercept is finally set so the lowest
//! total equals the configured minimum exactly.
//!
//! Each stage is optional, but the order is not: rebalancing before scaling, for
//! instance, would break the min/max guarantee.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::domain::{ModelInput, ScalingMethod, ScorecardConfig, ScorecardRow, ScorecardTable};
use crate::error::ScorecardError;
use crate::rounding::{BoundPreservingRounder, IntegerRounder, RoundingOutcome};
use crate::scaling::{rebalance, scale_points};

/// Output of one pass through the stages.
#[derive(Debug, Clone)]
pub struct AssembledScorecard {
    pub table: ScorecardTable,
    /// Intercept to add at scoring time.
    pub intercept: f64,
    pub rounding: Option<RoundingOutcome>,
    pub time_build: Duration,
    pub time_rounding: Duration,
}

/// Build the raw-points table from binning tables and coefficients.
pub fn compute_raw_points(input: &ModelInput) -> Result<ScorecardTable, ScorecardError> {
    let coefficients = input
        .coefficients
        .as_ref()
        .ok_or(ScorecardError::MissingCoefficients)?;

    if input.variables.is_empty() {
        return Err(ScorecardError::input("No selected variables in model input."));
    }
    if coefficients.len() != input.variables.len() {
        return Err(ScorecardError::input(format!(
            "Got {} coefficients for {} variables.",
            coefficients.len(),
            input.variables.len()
        )));
    }
    if let Some(intercept) = input.intercept.filter(|v| !v.is_finite()) {
        return Err(ScorecardError::input(format!("Non-finite intercept {intercept}.")));
    }

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for (table, &c) in input.variables.iter().zip(coefficients) {
        if !seen.insert(table.name.as_str()) {
            return Err(ScorecardError::input(format!(
                "Variable '{}' appears more than once.",
                table.name
            )));
        }
        if table.bins.is_empty() {
            return Err(ScorecardError::input(format!(
                "Variable '{}' has no bins.",
                table.name
            )));
        }
        if !c.is_finite() {
            return Err(ScorecardError::input(format!(
                "Non-finite coefficient {c} for variable '{}'.",
                table.name
            )));
        }

        for (bin_id, bin) in table.bins.iter().enumerate() {
            if !bin.statistic.is_finite() {
                return Err(ScorecardError::input(format!(
                    "Non-finite {} in bin '{}' of variable '{}'.",
                    input.target.statistic_label(),
                    bin.bin,
                    table.name
                )));
            }
            rows.push(ScorecardRow {
                variable: table.name.clone(),
                bin_id,
                bin: bin.bin.clone(),
                count: bin.count,
                statistic: bin.statistic,
                coefficient: c,
                points: bin.statistic * c,
            });
        }
    }

    Ok(ScorecardTable::new(rows))
}

/// Run every enabled stage, in order, over the raw points of `input`.
///
/// `method` must come from `scaling::validate_scaling` for the same config.
pub fn assemble(
    input: &ModelInput,
    method: &ScalingMethod,
    config: &ScorecardConfig,
    rounder: &dyn BoundPreservingRounder,
) -> Result<AssembledScorecard, ScorecardError> {
    let start = Instant::now();

    let mut table = compute_raw_points(input)?;
    let mut intercept = input.intercept.unwrap_or(0.0);

    if !method.is_none() {
        let scaled = scale_points(
            &table.points(),
            table.groups(),
            method,
            intercept,
            config.reverse_scorecard,
        )?;
        table.set_points(&scaled);
        // Scaling spreads the intercept over the variables.
        intercept = 0.0;
    }

    if config.intercept_based {
        let (points, removed) = rebalance(table.rows());
        table.set_points(&points);
        intercept += removed;
    }

    let time_build = start.elapsed();

    let mut rounding = None;
    let mut time_rounding = Duration::ZERO;
    if config.rounding {
        let start = Instant::now();
        let outcome = IntegerRounder::new(rounder).round(&table, method);
        table.set_points(&outcome.points);
        time_rounding = start.elapsed();
        rounding = Some(outcome);
    }

    // Rebalanced min/max totals are anchored on the configured minimum.
    if config.intercept_based {
        if let ScalingMethod::MinMax { min, .. } = *method {
            let lowest: f64 = table
                .groups()
                .min_max(&table.points())
                .iter()
                .map(|(lo, _)| lo)
                .sum();
            intercept = min - lowest;
        }
    }

    Ok(AssembledScorecard {
        table,
        intercept,
        rounding,
        time_build,
        time_rounding,
    })
}
