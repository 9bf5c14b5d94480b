//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numeric code stays clean and testable
//! - output changes are localized

use crate::domain::{ScorecardConfig, ScorecardTable, TableStyle, TargetKind};
use crate::io::ingest::RowError;
use crate::scaling::score_range;
use crate::scorecard::FittedScorecard;

/// Format the scorecard table.
pub fn format_table(table: &ScorecardTable, target: TargetKind, style: TableStyle) -> String {
    let mut out = String::new();
    let var_w = column_width(table.rows().iter().map(|r| r.variable.as_str()), "Variable", 32);
    let bin_w = column_width(table.rows().iter().map(|r| r.bin.as_str()), "Bin", 40);

    match style {
        TableStyle::Summary => {
            push_line(&mut out, format!("{:<var_w$} {:<bin_w$} {:>10}", "Variable", "Bin", "Points"));
            push_line(&mut out, format!("{:-<var_w$} {:-<bin_w$} {:-<10}", "", "", ""));
            for r in table.rows() {
                push_line(
                    &mut out,
                    format!(
                        "{:<var_w$} {:<bin_w$} {:>10}",
                        truncate(&r.variable, var_w),
                        truncate(&r.bin, bin_w),
                        fmt_points(r.points),
                    ),
                );
            }
        }
        TableStyle::Detailed => {
            push_line(
                &mut out,
                format!(
                    "{:<var_w$} {:>6} {:<bin_w$} {:>8} {:>10} {:>11} {:>10}",
                    "Variable",
                    "Bin id",
                    "Bin",
                    "Count",
                    target.statistic_label(),
                    "Coefficient",
                    "Points"
                ),
            );
            push_line(
                &mut out,
                format!(
                    "{:-<var_w$} {:-<6} {:-<bin_w$} {:-<8} {:-<10} {:-<11} {:-<10}",
                    "", "", "", "", "", "", ""
                ),
            );
            for r in table.rows() {
                push_line(
                    &mut out,
                    format!(
                        "{:<var_w$} {:>6} {:<bin_w$} {:>8} {:>10.6} {:>11.6} {:>10}",
                        truncate(&r.variable, var_w),
                        r.bin_id,
                        truncate(&r.bin, bin_w),
                        r.count.map(|c| c.to_string()).unwrap_or_default(),
                        r.statistic,
                        r.coefficient,
                        fmt_points(r.points),
                    ),
                );
            }
        }
    }

    out
}

/// Text overview of a fitted scorecard.
///
/// `print_level` 0: header and timings. 1: adds options and outcome.
/// 2: adds the point range of every variable.
pub fn format_information(fitted: &FittedScorecard, config: &ScorecardConfig, print_level: u8) -> String {
    let mut out = String::new();
    let report = &fitted.report;

    out.push_str("=== scorecard - Scorecard Points ===\n");

    if print_level >= 1 {
        out.push_str("\nBegin options\n");
        out.push_str(&format!("  target                 {:>12}\n", format!("{:?}", fitted.target).to_lowercase()));
        out.push_str(&format!("  scaling_method         {:>12}\n", fitted.scaling.name()));
        let params = config
            .scaling_method_params
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| "no".to_string());
        out.push_str(&format!("  scaling_method_params  {params:>12}\n"));
        out.push_str(&format!("  intercept_based        {:>12}\n", config.intercept_based));
        out.push_str(&format!("  reverse_scorecard      {:>12}\n", config.reverse_scorecard));
        out.push_str(&format!("  rounding               {:>12}\n", config.rounding));
        out.push_str(&format!("  verbose                {:>12}\n", config.verbose));
        out.push_str("End options\n");

        out.push_str("\nOutcome:\n");
        out.push_str(&format!("  Variables              {:>12}\n", report.n_variables));
        out.push_str(&format!("  Bins                   {:>12}\n", report.n_rows));
        out.push_str(&format!("  Intercept              {:>12.6}\n", fitted.intercept));
        let (lo, hi) = score_range(&fitted.table.points(), fitted.table.groups(), fitted.intercept);
        out.push_str(&format!("  Score range            [{}, {}]\n", fmt_points(lo), fmt_points(hi)));
        let rounding = report
            .rounding
            .map(|r| r.describe())
            .unwrap_or_else(|| "not requested".to_string());
        out.push_str(&format!("  Rounding               {rounding}\n"));
    }

    if print_level >= 2 {
        out.push_str("\nPoints by variable:\n");
        let ranges = fitted.table.groups().min_max(&fitted.table.points());
        for (group, (lo, hi)) in fitted.table.groups().iter().zip(ranges) {
            out.push_str(&format!(
                "  {:<24} bins={:<3} min={:>10} max={:>10}\n",
                truncate(&group.name, 24),
                group.indices.len(),
                fmt_points(lo),
                fmt_points(hi)
            ));
        }
    }

    let total = report.time_total.as_secs_f64();
    let build = report.time_build.as_secs_f64();
    let rounding = report.time_rounding.as_secs_f64();
    out.push_str("\nTiming:\n");
    out.push_str(&format!("  Total time             {total:>10.4} sec\n"));
    out.push_str(&format!("  Scorecard build        {build:>10.4} sec ({:>5.1}%)\n", pct(build, total)));
    out.push_str(&format!("  Rounding               {rounding:>10.4} sec ({:>5.1}%)\n", pct(rounding, total)));

    out
}

/// One-line distribution summary of a batch of scores.
pub fn format_score_summary(scores: &[f64]) -> String {
    if scores.is_empty() {
        return "Scores: n=0\n".to_string();
    }
    let n = scores.len();
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = scores.iter().sum::<f64>() / n as f64;
    format!(
        "Scores: n={n} | min={} | mean={mean:.2} | max={}\n",
        fmt_points(min),
        fmt_points(max)
    )
}

/// First `limit` ingest row errors, one per line.
pub fn format_row_errors(errors: &[RowError], limit: usize) -> String {
    let mut out = String::new();
    for e in errors.iter().take(limit) {
        match &e.id {
            Some(id) => out.push_str(&format!("  line {} ({id}): {}\n", e.line, e.message)),
            None => out.push_str(&format!("  line {}: {}\n", e.line, e.message)),
        }
    }
    if errors.len() > limit {
        out.push_str(&format!("  ... and {} more\n", errors.len() - limit));
    }
    out
}

/// Integers print without decimals, everything else with four.
fn fmt_points(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}

fn pct(part: f64, total: f64) -> f64 {
    if total > 0.0 { 100.0 * part / total } else { 0.0 }
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str, max: usize) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        .min(max)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticConfig, generate_model};
    use crate::domain::ScorecardRow;
    use crate::scorecard::Scorecard;

    fn table() -> ScorecardTable {
        ScorecardTable::new(vec![
            ScorecardRow {
                variable: "age".to_string(),
                bin_id: 0,
                bin: "(-inf, 25.00)".to_string(),
                count: Some(40),
                statistic: -0.5,
                coefficient: -1.0,
                points: 12.0,
            },
            ScorecardRow {
                variable: "age".to_string(),
                bin_id: 1,
                bin: "[25.00, inf)".to_string(),
                count: None,
                statistic: 0.25,
                coefficient: -1.0,
                points: 30.5,
            },
        ])
    }

    #[test]
    fn summary_table_layout() {
        let text = format_table(&table(), TargetKind::Binary, TableStyle::Summary);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Variable"));
        assert!(lines[0].ends_with("Points"));
        assert!(lines[2].contains("(-inf, 25.00)"));
        assert!(lines[2].ends_with(" 12"));
        assert!(lines[3].ends_with(" 30.5000"));
    }

    #[test]
    fn detailed_table_names_the_statistic() {
        let text = format_table(&table(), TargetKind::Binary, TableStyle::Detailed);
        assert!(text.lines().next().unwrap().contains("WoE"));
        let text = format_table(&table(), TargetKind::Continuous, TableStyle::Detailed);
        assert!(text.lines().next().unwrap().contains("Mean"));
    }

    #[test]
    fn information_grows_with_print_level() {
        let data = generate_model(&SyntheticConfig::default()).unwrap();
        let config = ScorecardConfig {
            scaling_method: Some("min_max".to_string()),
            scaling_method_params: Some([("min".to_string(), 0.0), ("max".to_string(), 100.0)].into()),
            rounding: true,
            ..ScorecardConfig::default()
        };
        let mut sc = Scorecard::new(config);
        sc.fit(&data.input).unwrap();

        let l0 = sc.information(0).unwrap();
        let l1 = sc.information(1).unwrap();
        let l2 = sc.information(2).unwrap();
        assert!(l0.contains("Timing:"));
        assert!(!l0.contains("Begin options"));
        assert!(l1.contains("Begin options"));
        assert!(l1.contains("Score range"));
        assert!(!l1.contains("Points by variable"));
        assert!(l2.contains("Points by variable"));
        assert!(l2.contains("x01"));
    }

    #[test]
    fn score_summary_and_row_errors() {
        assert_eq!(
            format_score_summary(&[1.0, 2.0, 6.0]),
            "Scores: n=3 | min=1 | mean=3.00 | max=6\n"
        );
        let errors = vec![
            RowError {
                line: 2,
                id: Some("a".to_string()),
                message: "bad".to_string(),
            },
            RowError {
                line: 3,
                id: None,
                message: "worse".to_string(),
            },
        ];
        assert_eq!(
            format_row_errors(&errors, 1),
            "  line 2 (a): bad\n  ... and 1 more\n"
        );
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
