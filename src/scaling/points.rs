//! Point scaling.
//!
//! Both conventions are affine in the raw points:
//!
//! ```text
//! pdo_odds: p' = -(sense * p + intercept / n) * factor + offset / n
//!           factor = pdo / ln 2, offset = scorecard_points - factor * ln(odds)
//!
//! min_max:  p' = base / n + slope * p
//!           slope = sense * (min - max) / (smax - smin)
//!           base  = shift + slope * intercept
//! ```
//!
//! where `n` is the number of variables and `sense = -1` for a reversed
//! scorecard. The model intercept is spread evenly over the variables, so the
//! scaled scorecard needs no separate intercept term.

use crate::domain::{ScalingMethod, VariableGroups};
use crate::error::ScorecardError;

/// Scale raw points onto the target range of `method`.
///
/// `points` is indexed like the rows `groups` was built from. `ScalingMethod::None`
/// returns the points unchanged.
pub fn scale_points(
    points: &[f64],
    groups: &VariableGroups,
    method: &ScalingMethod,
    intercept: f64,
    reverse: bool,
) -> Result<Vec<f64>, ScorecardError> {
    if groups.is_empty() {
        return Err(ScorecardError::input("Cannot scale a scorecard with no variables."));
    }
    let n = groups.len() as f64;
    let sense = if reverse { -1.0 } else { 1.0 };

    match *method {
        ScalingMethod::None => Ok(points.to_vec()),
        ScalingMethod::PdoOdds {
            pdo,
            odds,
            scorecard_points,
        } => {
            let factor = pdo / std::f64::consts::LN_2;
            let offset = scorecard_points - factor * odds.ln();
            Ok(points
                .iter()
                .map(|&p| -(sense * p + intercept / n) * factor + offset / n)
                .collect())
        }
        ScalingMethod::MinMax { min: a, max: b } => {
            let (min_p, max_p) = groups
                .min_max(points)
                .into_iter()
                .fold((0.0, 0.0), |(lo, hi), (vmin, vmax)| (lo + vmin, hi + vmax));

            let smin = intercept + min_p;
            let smax = intercept + max_p;
            let range = smax - smin;
            if range == 0.0 || !range.is_finite() {
                return Err(ScorecardError::NumericDegeneracy { smin, smax });
            }

            let slope = sense * (a - b) / range;
            let shift = if reverse { a - slope * smin } else { b - slope * smin };
            let base = shift + slope * intercept;
            log::debug!("min_max scaling: smin={smin} smax={smax} slope={slope} shift={shift}");

            Ok(points.iter().map(|&p| base / n + slope * p).collect())
        }
    }
}

/// Theoretical `(lowest, highest)` total score: per-variable extremes plus intercept.
pub fn score_range(points: &[f64], groups: &VariableGroups, intercept: f64) -> (f64, f64) {
    groups
        .min_max(points)
        .into_iter()
        .fold((intercept, intercept), |(lo, hi), (vmin, vmax)| (lo + vmin, hi + vmax))
}
