//! Scoring observations against a scorecard.
//!
//! `score = Σ_v points[v][bin_v] + intercept`. Each observation is independent,
//! so batches are scored in parallel; output order equals input order.

use rayon::prelude::*;

use crate::domain::{Observation, ScorecardTable};
use crate::error::ScorecardError;

/// Check that `obs` has one valid bin id per variable of `table`.
pub fn check_observation(table: &ScorecardTable, obs: &Observation) -> Result<(), ScorecardError> {
    let n = table.groups().len();
    if obs.bins.len() != n {
        return Err(ScorecardError::input(format!(
            "Observation {} has {} bins but the scorecard has {n} variables.",
            obs_label(obs),
            obs.bins.len()
        )));
    }
    for (var, &bin_id) in obs.bins.iter().enumerate() {
        let bins = table.bin_count(var);
        if bin_id >= bins {
            let name = table
                .groups()
                .iter()
                .nth(var)
                .map(|g| g.name.as_str())
                .unwrap_or("?");
            return Err(ScorecardError::input(format!(
                "Observation {}: bin id {bin_id} out of range for variable '{name}' ({bins} bins).",
                obs_label(obs)
            )));
        }
    }
    Ok(())
}

/// Score a single observation.
pub fn score_one(
    table: &ScorecardTable,
    intercept: f64,
    obs: &Observation,
) -> Result<f64, ScorecardError> {
    check_observation(table, obs)?;
    let total: f64 = obs
        .bins
        .iter()
        .enumerate()
        .filter_map(|(var, &bin_id)| table.points_at(var, bin_id))
        .sum();
    Ok(total + intercept)
}

/// Score a batch of observations (parallel).
pub fn score_observations(
    table: &ScorecardTable,
    intercept: f64,
    observations: &[Observation],
) -> Result<Vec<f64>, ScorecardError> {
    observations
        .par_iter()
        .map(|obs| score_one(table, intercept, obs))
        .collect()
}

fn obs_label(obs: &Observation) -> String {
    obs.id.clone().unwrap_or_else(|| "<unnamed>".to_string())
}
