//! Read/write scorecard JSON files.
//!
//! A scorecard file is the portable form of a fitted scorecard: the final
//! points table plus the intercept needed to score, and enough metadata to
//! tell how it was built. `scorecard score` only needs this file.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::{ScalingMethod, ScorecardConfig, ScorecardRow, ScorecardTable, TargetKind};
use crate::error::ScorecardError;
use crate::rounding::RoundingSummary;
use crate::scorecard::FittedScorecard;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardFile {
    pub tool: String,
    pub generated: DateTime<Local>,
    pub target: TargetKind,
    pub scaling: ScalingMethod,
    pub intercept_based: bool,
    pub reverse_scorecard: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<RoundingSummary>,
    pub intercept: f64,
    pub rows: Vec<ScorecardRow>,
}

impl ScorecardFile {
    pub fn from_fitted(fitted: &FittedScorecard, config: &ScorecardConfig) -> Self {
        Self {
            tool: "scorecard".to_string(),
            generated: Local::now(),
            target: fitted.target,
            scaling: fitted.scaling,
            intercept_based: config.intercept_based,
            reverse_scorecard: config.reverse_scorecard,
            rounding: fitted.report.rounding,
            intercept: fitted.intercept,
            rows: fitted.table.rows().to_vec(),
        }
    }

    /// Rebuild the scorecard table, checking the rows are usable for scoring.
    pub fn table(&self) -> Result<ScorecardTable, ScorecardError> {
        if self.rows.is_empty() {
            return Err(ScorecardError::input("Scorecard file has no rows."));
        }
        if !self.intercept.is_finite() {
            return Err(ScorecardError::input("Scorecard file intercept is not finite."));
        }
        if let Some(row) = self.rows.iter().find(|r| !r.points.is_finite()) {
            return Err(ScorecardError::input(format!(
                "Non-finite points for `{}` bin {}.",
                row.variable, row.bin_id
            )));
        }

        let table = ScorecardTable::new(self.rows.clone());
        for group in table.groups().iter() {
            let in_order = group
                .indices
                .iter()
                .enumerate()
                .all(|(pos, &i)| table.rows()[i].bin_id == pos);
            if !in_order {
                return Err(ScorecardError::input(format!(
                    "Rows of `{}` must list bin ids 0, 1, ... in order.",
                    group.name
                )));
            }
        }
        Ok(table)
    }
}

/// Write a scorecard JSON file.
pub fn write_scorecard_json(path: &Path, scorecard: &ScorecardFile) -> Result<(), ScorecardError> {
    let file = File::create(path)
        .map_err(|e| ScorecardError::io(format!("Failed to create scorecard JSON '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(file, scorecard)
        .map_err(|e| ScorecardError::io("Failed to write scorecard JSON", e.into()))?;
    Ok(())
}

/// Read a scorecard JSON file.
pub fn read_scorecard_json(path: &Path) -> Result<ScorecardFile, ScorecardError> {
    let file = File::open(path)
        .map_err(|e| ScorecardError::io(format!("Failed to open scorecard JSON '{}'", path.display()), e))?;
    serde_json::from_reader(file).map_err(|e| ScorecardError::input(format!("Invalid scorecard JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticConfig, generate_model};
    use crate::scorecard::{Scorecard, score_observations};

    fn fitted_file() -> (ScorecardFile, crate::data::SyntheticData, Vec<f64>) {
        let data = generate_model(&SyntheticConfig {
            n_observations: 25,
            ..SyntheticConfig::default()
        })
        .unwrap();
        let config = ScorecardConfig {
            scaling_method: Some("min_max".to_string()),
            scaling_method_params: Some([("min".to_string(), 0.0), ("max".to_string(), 100.0)].into()),
            rounding: true,
            ..ScorecardConfig::default()
        };
        let mut sc = Scorecard::new(config.clone());
        sc.fit(&data.input).unwrap();
        let scores = sc.score(&data.observations).unwrap();
        let file = ScorecardFile::from_fitted(sc.fitted().unwrap(), &config);
        (file, data, scores)
    }

    #[test]
    fn json_reload_scores_identically() {
        let (file, data, scores) = fitted_file();
        let json = serde_json::to_string_pretty(&file).unwrap();
        let reloaded: ScorecardFile = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.scaling, file.scaling);
        assert_eq!(reloaded.rounding, file.rounding);

        let table = reloaded.table().unwrap();
        let rescored = score_observations(&table, reloaded.intercept, &data.observations).unwrap();
        for (a, b) in rescored.iter().zip(&scores) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn shuffled_rows_are_rejected() {
        let (mut file, _, _) = fitted_file();
        file.rows.swap(0, 1);
        assert!(matches!(file.table(), Err(ScorecardError::InvalidInput(_))));
    }
}
