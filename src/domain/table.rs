//! Scorecard rows and per-variable grouping.
//!
//! The scorecard is a flat list of rows, but every numeric stage works per
//! variable. `VariableGroups` is the explicit ordered grouping (variable name →
//! row indices, in order of first appearance) that those stages share.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One bin of one variable with its point contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardRow {
    pub variable: String,
    /// Position of the bin inside its variable's binning table.
    pub bin_id: usize,
    pub bin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub statistic: f64,
    pub coefficient: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableGroup {
    pub name: String,
    pub indices: Vec<usize>,
}

/// Ordered map from variable name to the indices of its rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableGroups {
    groups: Vec<VariableGroup>,
    lookup: HashMap<String, usize>,
}

impl VariableGroups {
    pub fn from_rows(rows: &[ScorecardRow]) -> Self {
        let mut out = VariableGroups::default();
        for (idx, row) in rows.iter().enumerate() {
            match out.lookup.get(&row.variable) {
                Some(&g) => out.groups[g].indices.push(idx),
                None => {
                    out.lookup.insert(row.variable.clone(), out.groups.len());
                    out.groups.push(VariableGroup {
                        name: row.variable.clone(),
                        indices: vec![idx],
                    });
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableGroup> {
        self.groups.iter()
    }

    pub fn get(&self, name: &str) -> Option<&VariableGroup> {
        self.lookup.get(name).map(|&g| &self.groups[g])
    }

    /// Per-variable `(min, max)` of `points`, in group order.
    ///
    /// `points` is indexed like the rows the groups were built from.
    pub fn min_max(&self, points: &[f64]) -> Vec<(f64, f64)> {
        self.groups
            .iter()
            .map(|g| {
                g.indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                    (lo.min(points[i]), hi.max(points[i]))
                })
            })
            .collect()
    }
}

/// The scorecard: rows plus their variable grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardTable {
    rows: Vec<ScorecardRow>,
    groups: VariableGroups,
}

impl ScorecardTable {
    pub fn new(rows: Vec<ScorecardRow>) -> Self {
        let groups = VariableGroups::from_rows(&rows);
        Self { rows, groups }
    }

    pub fn rows(&self) -> &[ScorecardRow] {
        &self.rows
    }

    pub fn groups(&self) -> &VariableGroups {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot of the current points column.
    pub fn points(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.points).collect()
    }

    /// Overwrite the points column.
    ///
    /// # Panics
    /// Panics if `points` does not have one value per row.
    pub fn set_points(&mut self, points: &[f64]) {
        assert_eq!(points.len(), self.rows.len(), "one point per scorecard row");
        for (row, &p) in self.rows.iter_mut().zip(points) {
            row.points = p;
        }
    }

    /// Points of the bin `bin_id` of the `var`-th variable.
    pub fn points_at(&self, var: usize, bin_id: usize) -> Option<f64> {
        let group = self.groups.groups.get(var)?;
        group.indices.get(bin_id).map(|&i| self.rows[i].points)
    }

    /// Statistic of the bin `bin_id` of the `var`-th variable.
    pub fn statistic_at(&self, var: usize, bin_id: usize) -> Option<f64> {
        let group = self.groups.groups.get(var)?;
        group.indices.get(bin_id).map(|&i| self.rows[i].statistic)
    }

    /// Number of bins of the `var`-th variable.
    pub fn bin_count(&self, var: usize) -> usize {
        self.groups.groups.get(var).map_or(0, |g| g.indices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(variable: &str, bin_id: usize, points: f64) -> ScorecardRow {
        ScorecardRow {
            variable: variable.to_string(),
            bin_id,
            bin: format!("bin{bin_id}"),
            count: None,
            statistic: 0.0,
            coefficient: 1.0,
            points,
        }
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let rows = vec![
            row("b", 0, 1.0),
            row("a", 0, 2.0),
            row("b", 1, 3.0),
            row("a", 1, -1.0),
        ];
        let groups = VariableGroups::from_rows(&rows);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(groups.get("b").unwrap().indices, vec![0, 2]);
        assert_eq!(groups.min_max(&[1.0, 2.0, 3.0, -1.0]), vec![(1.0, 3.0), (-1.0, 2.0)]);
    }

    #[test]
    fn lookups_by_variable_position() {
        let table = ScorecardTable::new(vec![row("x", 0, 5.0), row("x", 1, 7.0), row("y", 0, 1.0)]);
        assert_eq!(table.points_at(0, 1), Some(7.0));
        assert_eq!(table.points_at(1, 0), Some(1.0));
        assert_eq!(table.points_at(1, 1), None);
        assert_eq!(table.bin_count(0), 2);
    }
}
