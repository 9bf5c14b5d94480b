//! Export scorecards, scores and observations to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Bin labels contain commas, so everything goes through `csv::Writer`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Observation, ScorecardTable, TableStyle, TargetKind};
use crate::error::ScorecardError;

fn create(path: &Path, what: &str) -> Result<File, ScorecardError> {
    File::create(path).map_err(|e| ScorecardError::io(format!("Failed to create {what} '{}'", path.display()), e))
}

fn csv_error(what: &str, e: csv::Error) -> ScorecardError {
    ScorecardError::io(format!("Failed to write {what}"), e.into())
}

/// Write the scorecard table to a CSV file.
pub fn write_scorecard_csv(
    path: &Path,
    table: &ScorecardTable,
    target: TargetKind,
    style: TableStyle,
) -> Result<(), ScorecardError> {
    write_scorecard_table(create(path, "scorecard CSV")?, table, target, style)
}

pub fn write_scorecard_table<W: Write>(
    writer: W,
    table: &ScorecardTable,
    target: TargetKind,
    style: TableStyle,
) -> Result<(), ScorecardError> {
    let mut w = csv::Writer::from_writer(writer);
    let err = |e| csv_error("scorecard CSV", e);

    match style {
        TableStyle::Summary => {
            w.write_record(["Variable", "Bin", "Points"]).map_err(err)?;
            for r in table.rows() {
                w.write_record([r.variable.as_str(), r.bin.as_str(), r.points.to_string().as_str()])
                    .map_err(err)?;
            }
        }
        TableStyle::Detailed => {
            w.write_record([
                "Variable",
                "Bin id",
                "Bin",
                "Count",
                target.statistic_label(),
                "Coefficient",
                "Points",
            ])
            .map_err(err)?;
            for r in table.rows() {
                w.write_record([
                    r.variable.clone(),
                    r.bin_id.to_string(),
                    r.bin.clone(),
                    r.count.map(|c| c.to_string()).unwrap_or_default(),
                    r.statistic.to_string(),
                    r.coefficient.to_string(),
                    r.points.to_string(),
                ])
                .map_err(err)?;
            }
        }
    }

    w.flush()
        .map_err(|e| ScorecardError::io("Failed to write scorecard CSV", e))
}

/// Write `id,score` per observation. Unnamed observations get their 1-based row number.
pub fn write_scores_csv(path: &Path, observations: &[Observation], scores: &[f64]) -> Result<(), ScorecardError> {
    write_scores(create(path, "scores CSV")?, observations, scores)
}

pub fn write_scores<W: Write>(writer: W, observations: &[Observation], scores: &[f64]) -> Result<(), ScorecardError> {
    if observations.len() != scores.len() {
        return Err(ScorecardError::input(format!(
            "Got {} scores for {} observations.",
            scores.len(),
            observations.len()
        )));
    }

    let mut w = csv::Writer::from_writer(writer);
    let err = |e| csv_error("scores CSV", e);
    w.write_record(["id", "score"]).map_err(err)?;
    for (i, (obs, score)) in observations.iter().zip(scores).enumerate() {
        let id = obs.id.clone().unwrap_or_else(|| (i + 1).to_string());
        w.write_record([id, score.to_string()]).map_err(err)?;
    }
    w.flush().map_err(|e| ScorecardError::io("Failed to write scores CSV", e))
}

/// Write observations in the layout `io::ingest` reads back (bin ids).
pub fn write_observations_csv(
    path: &Path,
    table: &ScorecardTable,
    observations: &[Observation],
) -> Result<(), ScorecardError> {
    let mut w = csv::Writer::from_writer(create(path, "observations CSV")?);
    let err = |e| csv_error("observations CSV", e);

    let mut header = vec!["id".to_string()];
    header.extend(table.groups().iter().map(|g| g.name.clone()));
    w.write_record(&header).map_err(err)?;

    for (i, obs) in observations.iter().enumerate() {
        let mut record = vec![obs.id.clone().unwrap_or_else(|| (i + 1).to_string())];
        record.extend(obs.bins.iter().map(|b| b.to_string()));
        w.write_record(&record).map_err(err)?;
    }
    w.flush()
        .map_err(|e| ScorecardError::io("Failed to write observations CSV", e))
}
