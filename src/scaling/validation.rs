//! Scaling configuration checks.
//!
//! The raw `(tag, params)` pair from the config is turned into a `ScalingMethod`
//! exactly once, before any numeric work. Every failure here is a configuration
//! error.

use crate::domain::{ScalingMethod, ScalingParams, TargetKind};
use crate::error::ScorecardError;

const PDO_ODDS_KEYS: [&str; 3] = ["pdo", "odds", "scorecard_points"];
const MIN_MAX_KEYS: [&str; 2] = ["min", "max"];

/// Validate a scaling tag and its parameters against the target type.
pub fn validate_scaling(
    method: Option<&str>,
    params: Option<&ScalingParams>,
    target: TargetKind,
) -> Result<ScalingMethod, ScorecardError> {
    let Some(method) = method else {
        return Ok(ScalingMethod::None);
    };

    let keys: &[&str] = match method {
        "pdo_odds" => &PDO_ODDS_KEYS,
        "min_max" => &MIN_MAX_KEYS,
        other => {
            return Err(ScorecardError::config(format!(
                "Invalid value for scaling_method '{other}'. Allowed values are \"pdo_odds\" and \"min_max\"."
            )));
        }
    };

    let Some(params) = params else {
        return Err(ScorecardError::config(
            "scaling_method_params cannot be empty if scaling_method is provided.",
        ));
    };

    if method == "pdo_odds" && target == TargetKind::Continuous {
        return Err(ScorecardError::config(
            "scaling_method \"pdo_odds\" is not supported for a continuous target.",
        ));
    }

    let exact = params.len() == keys.len() && keys.iter().all(|k| params.contains_key(*k));
    if !exact {
        let given: Vec<&str> = params.keys().map(String::as_str).collect();
        return Err(ScorecardError::config(format!(
            "scaling_method_params must be {keys:?} given scaling_method = {method}; got {given:?}."
        )));
    }

    for key in keys {
        let value = params[*key];
        if !value.is_finite() {
            return Err(ScorecardError::config(format!(
                "{key} must be a finite number; got {value}."
            )));
        }
    }

    if method == "pdo_odds" {
        for key in keys {
            let value = params[*key];
            if value <= 0.0 {
                return Err(ScorecardError::config(format!(
                    "{key} must be a positive number; got {value}."
                )));
            }
        }
        return Ok(ScalingMethod::PdoOdds {
            pdo: params["pdo"],
            odds: params["odds"],
            scorecard_points: params["scorecard_points"],
        });
    }

    let (min, max) = (params["min"], params["max"]);
    if min > max {
        return Err(ScorecardError::config(format!(
            "min must be <= max; got {min} > {max}."
        )));
    }
    Ok(ScalingMethod::MinMax { min, max })
}
