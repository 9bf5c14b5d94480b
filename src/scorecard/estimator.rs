//! Scorecard lifecycle: configure, fit, then query.
//!
//! Query methods (`table`, `score`, `predict`, ...) return
//! `ScorecardError::NotFitted` until `fit` has succeeded.

use std::time::{Duration, Instant};

use crate::domain::{
    ModelInput, Observation, ScalingMethod, ScorecardConfig, ScorecardTable, TableStyle, TargetKind,
};
use crate::error::ScorecardError;
use crate::models::{LinearModel, design_matrix};
use crate::rounding::{BoundPreservingRounder, GreedyBoundRounder, RoundingSummary};
use crate::scaling::validate_scaling;
use crate::scorecard::assembler::assemble;
use crate::scorecard::score::score_observations;

/// Bookkeeping for one fit.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub n_variables: usize,
    pub n_rows: usize,
    pub rounding: Option<RoundingSummary>,
    pub time_build: Duration,
    pub time_rounding: Duration,
    pub time_total: Duration,
}

/// Everything produced by a successful fit.
#[derive(Debug, Clone)]
pub struct FittedScorecard {
    pub target: TargetKind,
    pub scaling: ScalingMethod,
    pub table: ScorecardTable,
    pub intercept: f64,
    pub model: LinearModel,
    pub report: FitReport,
}

pub struct Scorecard {
    config: ScorecardConfig,
    rounder: Box<dyn BoundPreservingRounder>,
    fitted: Option<FittedScorecard>,
}

impl std::fmt::Debug for Scorecard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorecard")
            .field("config", &self.config)
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}

impl Scorecard {
    /// New scorecard using the built-in bound-preserving rounder.
    pub fn new(config: ScorecardConfig) -> Self {
        Self::with_rounder(config, Box::new(GreedyBoundRounder))
    }

    pub fn with_rounder(config: ScorecardConfig, rounder: Box<dyn BoundPreservingRounder>) -> Self {
        Self {
            config,
            rounder,
            fitted: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Build the scorecard from binning tables and estimator coefficients.
    ///
    /// A failed fit leaves any previous fit in place.
    pub fn fit(&mut self, input: &ModelInput) -> Result<&FittedScorecard, ScorecardError> {
        let start = Instant::now();
        let verbose = self.config.verbose;

        if verbose {
            log::info!("Scorecard building process started.");
        }

        let scaling = validate_scaling(
            self.config.scaling_method.as_deref(),
            self.config.scaling_method_params.as_ref(),
            input.target,
        )?;
        if verbose {
            log::info!(
                "Dataset: {:?} target, {} variables, scaling: {}.",
                input.target,
                input.variables.len(),
                scaling.name()
            );
        }

        let assembled = assemble(input, &scaling, &self.config, self.rounder.as_ref())?;

        let rounding = assembled.rounding.as_ref().map(|o| o.summary());
        if let Some(summary) = &rounding {
            // Reported regardless of verbosity: callers rely on it to notice degraded rounding.
            log::info!("Rounding: {}", summary.describe());
        }

        let coefficients = input
            .coefficients
            .as_deref()
            .ok_or(ScorecardError::MissingCoefficients)?;
        let model = LinearModel::new(input.target, input.intercept.unwrap_or(0.0), coefficients);

        let report = FitReport {
            n_variables: assembled.table.groups().len(),
            n_rows: assembled.table.len(),
            rounding,
            time_build: assembled.time_build,
            time_rounding: assembled.time_rounding,
            time_total: start.elapsed(),
        };

        if verbose {
            log::info!(
                "Scorecard building process terminated. Time: {:.4}s",
                report.time_total.as_secs_f64()
            );
        }

        Ok(&*self.fitted.insert(FittedScorecard {
            target: input.target,
            scaling,
            table: assembled.table,
            intercept: assembled.intercept,
            model,
            report,
        }))
    }

    pub fn fitted(&self) -> Result<&FittedScorecard, ScorecardError> {
        self.fitted.as_ref().ok_or(ScorecardError::NotFitted)
    }

    pub fn table(&self) -> Result<&ScorecardTable, ScorecardError> {
        Ok(&self.fitted()?.table)
    }

    /// The scorecard table laid out in `style`.
    pub fn table_text(&self, style: TableStyle) -> Result<String, ScorecardError> {
        let fitted = self.fitted()?;
        Ok(crate::report::format_table(&fitted.table, fitted.target, style))
    }

    /// Intercept to add to the summed points at scoring time.
    pub fn intercept(&self) -> Result<f64, ScorecardError> {
        Ok(self.fitted()?.intercept)
    }

    pub fn score(&self, observations: &[Observation]) -> Result<Vec<f64>, ScorecardError> {
        let fitted = self.fitted()?;
        score_observations(&fitted.table, fitted.intercept, observations)
    }

    pub fn predict(&self, observations: &[Observation]) -> Result<Vec<f64>, ScorecardError> {
        let fitted = self.fitted()?;
        let x = design_matrix(&fitted.table, observations)?;
        fitted.model.predict(&x)
    }

    pub fn predict_proba(&self, observations: &[Observation]) -> Result<Vec<[f64; 2]>, ScorecardError> {
        let fitted = self.fitted()?;
        let x = design_matrix(&fitted.table, observations)?;
        fitted.model.predict_proba(&x)
    }

    /// Decision function of the underlying estimator (log-odds for binary targets).
    pub fn decision_function(&self, observations: &[Observation]) -> Result<Vec<f64>, ScorecardError> {
        let fitted = self.fitted()?;
        let x = design_matrix(&fitted.table, observations)?;
        Ok(fitted.model.decision_function(&x)?.iter().copied().collect())
    }

    /// Text overview of options and fit statistics.
    pub fn information(&self, print_level: u8) -> Result<String, ScorecardError> {
        let fitted = self.fitted()?;
        Ok(crate::report::format_information(fitted, &self.config, print_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticConfig, generate_model};
    use crate::rounding::{RoundingModel, RoundingSolution, RoundingStatus, round_nearest};
    use crate::scaling::score_range;

    fn config(method: &str, params: &[(&str, f64)]) -> ScorecardConfig {
        ScorecardConfig {
            scaling_method: Some(method.to_string()),
            scaling_method_params: Some(params.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
            ..ScorecardConfig::default()
        }
    }

    fn synthetic(seed: u64) -> crate::data::SyntheticData {
        generate_model(&SyntheticConfig {
            seed,
            n_variables: 5,
            n_observations: 40,
            ..SyntheticConfig::default()
        })
        .unwrap()
    }

    fn assert_rel_close(a: f64, b: f64) {
        let tol = 1e-9 * b.abs().max(1.0);
        assert!((a - b).abs() <= tol, "expected {b}, got {a}");
    }

    #[test]
    fn queries_before_fit_are_not_fitted_errors() {
        let sc = Scorecard::new(ScorecardConfig::default());
        assert!(matches!(sc.table(), Err(ScorecardError::NotFitted)));
        assert!(matches!(sc.table_text(TableStyle::Summary), Err(ScorecardError::NotFitted)));
        assert!(matches!(sc.score(&[]), Err(ScorecardError::NotFitted)));
        assert!(matches!(sc.predict(&[]), Err(ScorecardError::NotFitted)));
        assert!(matches!(sc.information(1), Err(ScorecardError::NotFitted)));
    }

    #[test]
    fn invalid_config_aborts_before_fitting() {
        let data = synthetic(1);
        let mut sc = Scorecard::new(config("min_max", &[("min", 10.0)]));
        assert!(matches!(sc.fit(&data.input), Err(ScorecardError::InvalidConfig(_))));
        assert!(!sc.is_fitted());
    }

    #[test]
    fn min_max_bounds_hold_in_both_senses() {
        for seed in 0..20 {
            let data = synthetic(seed);
            for reverse in [false, true] {
                let mut cfg = config("min_max", &[("min", 300.0), ("max", 850.0)]);
                cfg.reverse_scorecard = reverse;
                let mut sc = Scorecard::new(cfg);
                let fitted = sc.fit(&data.input).unwrap();

                let (lo, hi) = score_range(&fitted.table.points(), fitted.table.groups(), fitted.intercept);
                assert_rel_close(lo, 300.0);
                assert_rel_close(hi, 850.0);
            }
        }
    }

    #[test]
    fn scores_are_affine_in_the_model_score() {
        for seed in 0..10 {
            let data = synthetic(seed);
            for reverse in [false, true] {
                let mut cfg = config("min_max", &[("min", 0.0), ("max", 1000.0)]);
                cfg.reverse_scorecard = reverse;
                let mut sc = Scorecard::new(cfg);
                sc.fit(&data.input).unwrap();

                let z = sc.decision_function(&data.observations).unwrap();
                let s = sc.score(&data.observations).unwrap();
                for i in 1..z.len() {
                    let dz = z[i] - z[0];
                    let ds = s[i] - s[0];
                    if dz.abs() < 1e-9 {
                        continue;
                    }
                    // Non-reversed: higher model score, fewer points.
                    if reverse {
                        assert!(ds * dz > -1e-9, "seed {seed}: ordering not preserved");
                    } else {
                        assert!(ds * dz < 1e-9, "seed {seed}: ordering not inverted");
                    }
                }
            }
        }
    }

    #[test]
    fn pdo_odds_total_is_offset_minus_factor_times_log_odds() {
        let (pdo, odds, points) = (20.0, 50.0_f64, 600.0);
        let factor = pdo / std::f64::consts::LN_2;
        let offset = points - factor * odds.ln();

        for seed in 0..5 {
            let data = synthetic(seed);
            let mut sc = Scorecard::new(config(
                "pdo_odds",
                &[("pdo", pdo), ("odds", odds), ("scorecard_points", points)],
            ));
            sc.fit(&data.input).unwrap();

            let z = sc.decision_function(&data.observations).unwrap();
            let s = sc.score(&data.observations).unwrap();
            for (zi, si) in z.iter().zip(&s) {
                assert_rel_close(*si, offset - factor * zi);
            }
        }
    }

    #[test]
    fn intercept_based_preserves_scores() {
        let data = synthetic(7);
        let base = config("pdo_odds", &[("pdo", 20.0), ("odds", 50.0), ("scorecard_points", 600.0)]);
        let mut plain = Scorecard::new(base.clone());
        plain.fit(&data.input).unwrap();

        let mut rebalanced = Scorecard::new(ScorecardConfig {
            intercept_based: true,
            ..base
        });
        let fitted = rebalanced.fit(&data.input).unwrap();
        for group in fitted.table.groups().iter() {
            let min = group
                .indices
                .iter()
                .map(|&i| fitted.table.rows()[i].points)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(min, 0.0);
        }

        let a = plain.score(&data.observations).unwrap();
        let b = rebalanced.score(&data.observations).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn rounded_min_max_keeps_integer_bounds() {
        for seed in 0..20 {
            let data = synthetic(seed);
            for reverse in [false, true] {
                let mut cfg = config("min_max", &[("min", 300.0), ("max", 850.0)]);
                cfg.rounding = true;
                cfg.reverse_scorecard = reverse;
                let mut sc = Scorecard::new(cfg);
                let fitted = sc.fit(&data.input).unwrap();

                let summary = fitted.report.rounding.unwrap();
                assert!(summary.status.is_usable(), "seed {seed}: {}", summary.describe());
                let points = fitted.table.points();
                assert!(points.iter().all(|p| p.fract() == 0.0));
                let (lo, hi) = score_range(&points, fitted.table.groups(), fitted.intercept);
                assert_eq!((lo, hi), (300.0, 850.0), "seed {seed}, reverse {reverse}");
            }
        }
    }

    struct NeverSolves;

    impl BoundPreservingRounder for NeverSolves {
        fn solve(&self, _model: &RoundingModel) -> RoundingSolution {
            RoundingSolution::failed(RoundingStatus::Infeasible)
        }
    }

    #[test]
    fn optimizer_failure_degrades_to_nearest_integer() {
        let data = synthetic(3);
        let cfg = config("min_max", &[("min", 300.0), ("max", 850.0)]);

        let mut unrounded = Scorecard::new(cfg.clone());
        let expected = round_nearest(&unrounded.fit(&data.input).unwrap().table.points());

        let mut sc = Scorecard::with_rounder(
            ScorecardConfig {
                rounding: true,
                ..cfg
            },
            Box::new(NeverSolves),
        );
        let fitted = sc.fit(&data.input).unwrap();
        assert_eq!(fitted.table.points(), expected);
        assert_eq!(fitted.report.rounding.unwrap().status, RoundingStatus::Infeasible);
    }

    #[test]
    fn predictions_follow_the_estimator() {
        let data = synthetic(11);
        let mut sc = Scorecard::new(ScorecardConfig::default());
        sc.fit(&data.input).unwrap();

        // Without scaling, score equals the decision function.
        let z = sc.decision_function(&data.observations).unwrap();
        let s = sc.score(&data.observations).unwrap();
        for (zi, si) in z.iter().zip(&s) {
            assert!((zi - si).abs() < 1e-9);
        }

        let proba = sc.predict_proba(&data.observations).unwrap();
        let labels = sc.predict(&data.observations).unwrap();
        for (p, y) in proba.iter().zip(&labels) {
            assert_eq!(*y, if p[1] >= 0.5 { 1.0 } else { 0.0 });
        }
    }
}
