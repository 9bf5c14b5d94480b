//! Evaluation of the fitted linear estimator behind a scorecard.
//!
//! The estimator itself is fitted elsewhere; here we only need its intercept and
//! coefficients to reproduce its outputs on binned observations:
//! - build a design row from each observation's bin statistics
//! - compute the decision function `intercept + X β`
//! - map it to class probabilities (binary targets)

use nalgebra::{DMatrix, DVector};

use crate::domain::{Observation, ScorecardTable, TargetKind};
use crate::error::ScorecardError;
use crate::scorecard::check_observation;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub target: TargetKind,
    pub intercept: f64,
    pub coefficients: DVector<f64>,
}

impl LinearModel {
    pub fn new(target: TargetKind, intercept: f64, coefficients: &[f64]) -> Self {
        Self {
            target,
            intercept,
            coefficients: DVector::from_column_slice(coefficients),
        }
    }

    /// Decision function (log-odds for binary targets) for each row of `x`.
    pub fn decision_function(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, ScorecardError> {
        if x.ncols() != self.coefficients.len() {
            return Err(ScorecardError::input(format!(
                "Design matrix has {} columns but the model has {} coefficients.",
                x.ncols(),
                self.coefficients.len()
            )));
        }
        Ok(x * &self.coefficients + DVector::from_element(x.nrows(), self.intercept))
    }

    /// `[P(y=0), P(y=1)]` per row. Binary targets only.
    pub fn predict_proba(&self, x: &DMatrix<f64>) -> Result<Vec<[f64; 2]>, ScorecardError> {
        if self.target != TargetKind::Binary {
            return Err(ScorecardError::input(
                "predict_proba is only available for a binary target.",
            ));
        }
        let z = self.decision_function(x)?;
        Ok(z.iter()
            .map(|&v| {
                let p1 = sigmoid(v);
                [1.0 - p1, p1]
            })
            .collect())
    }

    /// Class labels (binary, threshold 0.5) or predicted values (continuous).
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, ScorecardError> {
        let z = self.decision_function(x)?;
        Ok(match self.target {
            TargetKind::Binary => z.iter().map(|&v| if sigmoid(v) >= 0.5 { 1.0 } else { 0.0 }).collect(),
            TargetKind::Continuous => z.iter().copied().collect(),
        })
    }
}

/// Fill one design row with the bin statistics of `obs`.
///
/// # Panics
/// Panics if `out` is shorter than the number of variables. Callers validate the
/// observation first (`check_observation`).
pub fn fill_design_row(table: &ScorecardTable, obs: &Observation, out: &mut [f64]) {
    for (var, &bin_id) in obs.bins.iter().enumerate() {
        out[var] = table.statistic_at(var, bin_id).unwrap_or(f64::NAN);
    }
}

/// Design matrix (observations × variables) of bin statistics.
pub fn design_matrix(
    table: &ScorecardTable,
    observations: &[Observation],
) -> Result<DMatrix<f64>, ScorecardError> {
    let p = table.groups().len();
    let mut x = DMatrix::<f64>::zeros(observations.len(), p);
    let mut row = vec![0.0; p];
    for (i, obs) in observations.iter().enumerate() {
        check_observation(table, obs)?;
        fill_design_row(table, obs, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }
    Ok(x)
}

fn sigmoid(z: f64) -> f64 {
    // Split by sign so exp never overflows.
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
