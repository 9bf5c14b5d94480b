//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - read from a model input file
//! - carried through the scaling / rebalancing / rounding stages
//! - exported to JSON/CSV and reloaded later for scoring

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Target type the upstream model was fitted on.
///
/// It decides which bin statistic feeds the points: WoE for binary targets,
/// the group mean for continuous targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Binary,
    Continuous,
}

impl TargetKind {
    /// Column name of the bin statistic for this target.
    pub fn statistic_label(self) -> &'static str {
        match self {
            TargetKind::Binary => "WoE",
            TargetKind::Continuous => "Mean",
        }
    }
}

/// Scorecard table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Variable, bin and points.
    Summary,
    /// Adds bin id, count, statistic and coefficient.
    Detailed,
}

/// Raw scaling parameters keyed by name (`pdo`, `odds`, `min`, ...).
pub type ScalingParams = BTreeMap<String, f64>;

/// A validated scaling method.
///
/// Built once per fit by `scaling::validate_scaling`; the numeric stages never
/// see an unvalidated tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ScalingMethod {
    None,
    PdoOdds {
        pdo: f64,
        odds: f64,
        scorecard_points: f64,
    },
    MinMax {
        min: f64,
        max: f64,
    },
}

impl ScalingMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ScalingMethod::None => "none",
            ScalingMethod::PdoOdds { .. } => "pdo_odds",
            ScalingMethod::MinMax { .. } => "min_max",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ScalingMethod::None)
    }
}

/// Options controlling how a scorecard is built.
///
/// The scaling tag and parameters stay raw here so that a bad tag or key set is
/// reported as a configuration error by validation rather than at parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardConfig {
    /// `"pdo_odds"`, `"min_max"` or absent for no scaling.
    pub scaling_method: Option<String>,
    pub scaling_method_params: Option<ScalingParams>,
    /// Shift each variable so its lowest point is zero and fold the mass into the intercept.
    pub intercept_based: bool,
    /// Invert the relationship between model score and scorecard points.
    pub reverse_scorecard: bool,
    /// Round points to integers.
    pub rounding: bool,
    /// Log progress at info level.
    pub verbose: bool,
}

/// One bin of a variable's binning table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Bin label as produced by the binning step (e.g. `"[25.00, 40.00)"`).
    pub bin: String,
    /// WoE (binary target) or mean (continuous target).
    pub statistic: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Binning table of one selected variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinTable {
    pub name: String,
    pub bins: Vec<Bin>,
}

/// Everything the scorecard needs from the binning step and the fitted estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    pub target: TargetKind,
    /// Estimator intercept; treated as 0 when the estimator exposes none.
    #[serde(default)]
    pub intercept: Option<f64>,
    /// One coefficient per variable, in `variables` order.
    #[serde(default)]
    pub coefficients: Option<Vec<f64>>,
    /// Selected variables in selection order.
    pub variables: Vec<BinTable>,
}

/// An observation expressed as one bin id per selected variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub id: Option<String>,
    /// Bin ids in variable order.
    pub bins: Vec<usize>,
}
