//! CSV ingest of observations to score.
//!
//! Expected layout: one column per scorecard variable holding either the bin id
//! (0-based, as in the detailed table) or the exact bin label, plus an optional
//! `id` column. Extra columns are ignored.
//!
//! Design goals:
//! - **Strict schema**: every scorecard variable needs a column
//! - **Row-level validation**: bad rows are skipped and reported, not fatal
//! - **Deterministic behavior**: output order equals file order

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Observation, ScorecardTable};
use crate::error::ScorecardError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct IngestedObservations {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path, table: &ScorecardTable) -> Result<IngestedObservations, ScorecardError> {
    let file = File::open(path)
        .map_err(|e| ScorecardError::io(format!("Failed to open CSV '{}'", path.display()), e))?;
    read_observations(file, table)
}

/// Read observations from any CSV source.
pub fn read_observations<R: Read>(
    source: R,
    table: &ScorecardTable,
) -> Result<IngestedObservations, ScorecardError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| ScorecardError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = table
        .groups()
        .iter()
        .map(|g| g.name.as_str())
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ScorecardError::input(format!(
            "Missing required columns for scorecard variables: {}",
            missing.join(", ")
        )));
    }

    let labels = build_label_maps(table);

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let id = get_optional(&record, &header_map, "id").map(str::to_string);
        match parse_row(&record, &header_map, table, &labels) {
            Ok(bins) => observations.push(Observation { id, bins }),
            Err(message) => row_errors.push(RowError { line, id, message }),
        }
    }

    if observations.is_empty() {
        return Err(ScorecardError::input("No valid observation rows in CSV."));
    }

    Ok(IngestedObservations {
        observations,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Per variable: bin label → bin id.
fn build_label_maps(table: &ScorecardTable) -> Vec<HashMap<&str, usize>> {
    table
        .groups()
        .iter()
        .map(|g| {
            g.indices
                .iter()
                .enumerate()
                .map(|(bin_id, &row)| (table.rows()[row].bin.as_str(), bin_id))
                .collect()
        })
        .collect()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    table: &ScorecardTable,
    labels: &[HashMap<&str, usize>],
) -> Result<Vec<usize>, String> {
    table
        .groups()
        .iter()
        .enumerate()
        .map(|(var, group)| {
            let cell = get_required(record, header_map, &group.name)?;
            let n_bins = group.indices.len();
            if let Ok(bin_id) = cell.parse::<usize>() {
                if bin_id < n_bins {
                    return Ok(bin_id);
                }
            }
            labels[var].get(cell).copied().ok_or_else(|| {
                format!(
                    "Unknown bin '{cell}' for variable `{}` (expected a bin id < {n_bins} or a bin label).",
                    group.name
                )
            })
        })
        .collect()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
