//! Shared "build" and "score" workflows.
//!
//! build: model JSON -> validation -> raw points -> scale -> rebalance -> round
//! score: scorecard JSON + observations CSV -> scores
//!
//! The CLI only prints and exports what these return.

use std::path::Path;

use crate::domain::{ModelInput, ScorecardConfig, ScorecardTable};
use crate::error::ScorecardError;
use crate::io::{IngestedObservations, ScorecardFile, load_observations, read_model_json, read_scorecard_json};
use crate::scorecard::{FittedScorecard, Scorecard, score_observations};

/// Outputs of one `scorecard build` run.
#[derive(Debug)]
pub struct BuildOutput {
    pub input: ModelInput,
    pub scorecard: Scorecard,
}

impl BuildOutput {
    pub fn fitted(&self) -> Result<&FittedScorecard, ScorecardError> {
        self.scorecard.fitted()
    }
}

/// Load a model JSON and fit a scorecard on it.
pub fn run_build(model_path: &Path, config: ScorecardConfig) -> Result<BuildOutput, ScorecardError> {
    let input = read_model_json(model_path)?;
    log::debug!(
        "Loaded model '{}': {} variables.",
        model_path.display(),
        input.variables.len()
    );

    let mut scorecard = Scorecard::new(config);
    scorecard.fit(&input)?;
    Ok(BuildOutput { input, scorecard })
}

/// Outputs of one `scorecard score` run.
#[derive(Debug, Clone)]
pub struct ScoreOutput {
    pub scorecard: ScorecardFile,
    pub table: ScorecardTable,
    pub ingest: IngestedObservations,
    pub scores: Vec<f64>,
}

/// Score an observations CSV with a saved scorecard.
pub fn run_score(scorecard_path: &Path, data_path: &Path) -> Result<ScoreOutput, ScorecardError> {
    let scorecard = read_scorecard_json(scorecard_path)?;
    let table = scorecard.table()?;
    let ingest = load_observations(data_path, &table)?;
    if !ingest.row_errors.is_empty() {
        log::warn!(
            "Skipped {} of {} rows in '{}'.",
            ingest.row_errors.len(),
            ingest.rows_read,
            data_path.display()
        );
    }

    let scores = score_observations(&table, scorecard.intercept, &ingest.observations)?;
    Ok(ScoreOutput {
        scorecard,
        table,
        ingest,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::data::{SyntheticConfig, generate_model};
    use crate::io::{write_model_json, write_observations_csv, write_scorecard_json};
    use crate::scorecard::compute_raw_points;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scorecard-pipeline-{}-{name}", std::process::id()))
    }

    #[test]
    fn build_export_and_score_round_trip() {
        let data = generate_model(&SyntheticConfig {
            seed: 5,
            n_observations: 30,
            ..SyntheticConfig::default()
        })
        .unwrap();
        let model_path = temp_path("model.json");
        let card_path = temp_path("card.json");
        let data_path = temp_path("obs.csv");
        write_model_json(&model_path, &data.input).unwrap();
        write_observations_csv(&data_path, &compute_raw_points(&data.input).unwrap(), &data.observations).unwrap();

        let config = ScorecardConfig {
            scaling_method: Some("pdo_odds".to_string()),
            scaling_method_params: Some(
                [
                    ("pdo".to_string(), 20.0),
                    ("odds".to_string(), 50.0),
                    ("scorecard_points".to_string(), 600.0),
                ]
                .into(),
            ),
            intercept_based: true,
            rounding: true,
            ..ScorecardConfig::default()
        };
        let build = run_build(&model_path, config.clone()).unwrap();
        let expected = build.scorecard.score(&data.observations).unwrap();
        write_scorecard_json(&card_path, &ScorecardFile::from_fitted(build.fitted().unwrap(), &config)).unwrap();

        let scored = run_score(&card_path, &data_path).unwrap();
        assert!(scored.ingest.row_errors.is_empty());
        assert_eq!(scored.scores.len(), expected.len());
        for (a, b) in scored.scores.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }

        for path in [model_path, card_path, data_path] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn missing_model_file_is_an_io_error() {
        let err = run_build(&temp_path("does-not-exist.json"), ScorecardConfig::default()).unwrap_err();
        assert!(matches!(err, ScorecardError::Io { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
