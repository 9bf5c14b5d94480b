//! Intercept-based rebalancing.
//!
//! Every variable is shifted so that its lowest point is exactly zero; the
//! removed minima are summed into a single intercept. For any observation,
//! `Σ old points == Σ new points + intercept`.

use crate::domain::{ScorecardRow, VariableGroups};

/// Rebalance points per variable. Returns the new points and the removed mass.
pub fn rebalance(rows: &[ScorecardRow]) -> (Vec<f64>, f64) {
    let groups = VariableGroups::from_rows(rows);
    let mut points: Vec<f64> = rows.iter().map(|r| r.points).collect();
    let mut intercept = 0.0;

    for (group, (min_point, _)) in groups.iter().zip(groups.min_max(&points)) {
        for &i in &group.indices {
            points[i] -= min_point;
        }
        intercept += min_point;
    }

    (points, intercept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(points: &[(&str, f64)]) -> Vec<ScorecardRow> {
        points
            .iter()
            .enumerate()
            .map(|(bin_id, (variable, p))| ScorecardRow {
                variable: variable.to_string(),
                bin_id,
                bin: String::new(),
                count: None,
                statistic: 0.0,
                coefficient: 1.0,
                points: *p,
            })
            .collect()
    }

    #[test]
    fn zeroes_each_variable_minimum() {
        let input = rows(&[("a", 12.0), ("a", 30.0), ("b", -4.0), ("b", 6.0), ("b", 1.0)]);
        let (points, intercept) = rebalance(&input);
        assert_eq!(points, vec![0.0, 18.0, 0.0, 10.0, 5.0]);
        assert_eq!(intercept, 8.0);

        // Observation (a bin 1, b bin 2) keeps its total.
        let before = 30.0 + 1.0;
        let after = points[1] + points[4] + intercept;
        assert!((before - after).abs() < 1e-12);
    }

    #[test]
    fn second_application_is_a_no_op() {
        let input = rows(&[("a", 2.5), ("a", -1.5), ("b", 7.0)]);
        let (points, _) = rebalance(&input);

        let mut again = input.clone();
        for (row, p) in again.iter_mut().zip(&points) {
            row.points = *p;
        }
        let (points2, delta) = rebalance(&again);
        assert_eq!(points2, points);
        assert_eq!(delta, 0.0);
    }
}
