//! Synthetic binned models for demos and invariant tests.
//!
//! A generated model looks like the output of a binning step plus a fitted
//! linear estimator:
//! - each variable gets `min_bins..=max_bins` bins over increasing cut points
//! - bin statistics are monotone across bins (WoE for binary, means for continuous)
//! - coefficients and intercept are drawn around typical fitted values
//!
//! Generation is fully determined by the seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Bin, BinTable, ModelInput, Observation, TargetKind};
use crate::error::ScorecardError;

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub target: TargetKind,
    pub n_variables: usize,
    pub min_bins: usize,
    pub max_bins: usize,
    pub n_observations: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            target: TargetKind::Binary,
            n_variables: 6,
            min_bins: 2,
            max_bins: 6,
            n_observations: 200,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub input: ModelInput,
    pub observations: Vec<Observation>,
}

/// Parameters of the draws for one target kind.
struct Draws {
    statistic: Normal<f64>,
    coefficient: Normal<f64>,
    intercept: Normal<f64>,
}

impl Draws {
    fn for_target(target: TargetKind) -> Result<Self, ScorecardError> {
        let normal = |mean: f64, sd: f64| {
            Normal::new(mean, sd)
                .map_err(|e| ScorecardError::config(format!("Synthetic distribution error: {e}")))
        };
        Ok(match target {
            // WoE = ln(non-event / event), so fitted coefficients are negative.
            TargetKind::Binary => Self {
                statistic: normal(0.0, 0.6)?,
                coefficient: normal(-0.9, 0.15)?,
                intercept: normal(-2.2, 0.3)?,
            },
            TargetKind::Continuous => Self {
                statistic: normal(50.0, 15.0)?,
                coefficient: normal(0.3, 0.1)?,
                intercept: normal(0.0, 5.0)?,
            },
        })
    }
}

pub fn generate_model(config: &SyntheticConfig) -> Result<SyntheticData, ScorecardError> {
    if config.n_variables == 0 {
        return Err(ScorecardError::config("Synthetic model needs at least one variable."));
    }
    if config.min_bins == 0 || config.max_bins < config.min_bins {
        return Err(ScorecardError::config(format!(
            "Invalid bin range {}..={} (must be >= 1 and ordered).",
            config.min_bins, config.max_bins
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let draws = Draws::for_target(config.target)?;

    let mut variables = Vec::with_capacity(config.n_variables);
    let mut coefficients = Vec::with_capacity(config.n_variables);
    for v in 0..config.n_variables {
        let k = rng.gen_range(config.min_bins..=config.max_bins);

        let mut stats: Vec<f64> = (0..k).map(|_| draws.statistic.sample(&mut rng)).collect();
        stats.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if rng.gen_bool(0.5) {
            stats.reverse();
        }

        let labels = bin_labels(&mut rng, k);
        let bins = stats
            .into_iter()
            .zip(labels)
            .map(|(statistic, bin)| Bin {
                bin,
                statistic,
                count: Some(rng.gen_range(50..=800)),
            })
            .collect();

        variables.push(BinTable {
            name: format!("x{:02}", v + 1),
            bins,
        });
        coefficients.push(draws.coefficient.sample(&mut rng));
    }

    let intercept = draws.intercept.sample(&mut rng);

    let observations = (0..config.n_observations)
        .map(|i| Observation {
            id: Some(format!("obs-{:04}", i + 1)),
            bins: variables
                .iter()
                .map(|t| rng.gen_range(0..t.bins.len()))
                .collect(),
        })
        .collect();

    Ok(SyntheticData {
        input: ModelInput {
            target: config.target,
            intercept: Some(intercept),
            coefficients: Some(coefficients),
            variables,
        },
        observations,
    })
}

/// Interval labels over `k - 1` increasing cut points in `[0, 100)`.
fn bin_labels(rng: &mut StdRng, k: usize) -> Vec<String> {
    let mut cuts: Vec<f64> = (0..k.saturating_sub(1)).map(|_| rng.gen_range(0.0..100.0)).collect();
    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut edges = Vec::with_capacity(k + 1);
    edges.push("-inf".to_string());
    edges.extend(cuts.iter().map(|c| format!("{c:.2}")));
    edges.push("inf".to_string());

    (0..k)
        .map(|i| {
            let open = if i == 0 { '(' } else { '[' };
            format!("{open}{}, {})", edges[i], edges[i + 1])
        })
        .collect()
}
