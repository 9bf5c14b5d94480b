//! Command-line parsing for the scorecard builder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scaling/rounding code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ScalingParams, ScorecardConfig, TableStyle};
use crate::error::ScorecardError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "scorecard", version, about = "Scorecard points builder (scaling, rebalancing, rounding)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a scorecard from a model JSON, print it, and optionally export it.
    Build(BuildArgs),
    /// Score observations with a previously exported scorecard JSON.
    Score(ScoreArgs),
    /// Write a synthetic model JSON (and observations) to play with.
    Demo(DemoArgs),
}

/// Options shaping the scorecard points.
#[derive(Debug, Args, Clone, Default)]
pub struct ScalingArgs {
    /// Scaling method: `pdo_odds` or `min_max`. No scaling when omitted.
    #[arg(long, value_name = "METHOD")]
    pub scaling_method: Option<String>,

    /// Scaling parameter, repeatable (e.g. `--param min=300 --param max=850`).
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Make the lowest points of every variable zero and move the mass to the intercept.
    #[arg(long)]
    pub intercept_based: bool,

    /// Reverse the relationship between model score and points.
    #[arg(long = "reverse")]
    pub reverse_scorecard: bool,

    /// Round points to integers.
    #[arg(long)]
    pub rounding: bool,

    /// Log progress (info level).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct BuildArgs {
    /// Model JSON: binning tables, coefficients and intercept.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    #[command(flatten)]
    pub scaling: ScalingArgs,

    /// Table layout for printing and CSV export.
    #[arg(long, value_enum, default_value_t = TableStyle::Summary)]
    pub style: TableStyle,

    /// Export the scorecard table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fitted scorecard to JSON (input of `scorecard score`).
    #[arg(long = "export-scorecard", value_name = "JSON")]
    pub export_scorecard: Option<PathBuf>,

    /// Print fit information at this level (0, 1 or 2).
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub info: Option<u8>,
}

#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    /// Scorecard JSON produced by `scorecard build --export-scorecard`.
    #[arg(long, value_name = "JSON")]
    pub scorecard: PathBuf,

    /// Observations CSV: one column per variable (bin id or label), optional `id`.
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    /// Export `id,score` to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Show up to N rejected rows.
    #[arg(long, default_value_t = 10)]
    pub show_errors: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of variables.
    #[arg(long, default_value_t = 6)]
    pub variables: usize,

    /// Number of observations for `--data-out`.
    #[arg(long, default_value_t = 200)]
    pub observations: usize,

    /// Generate a continuous-target model instead of a binary one.
    #[arg(long)]
    pub continuous: bool,

    /// Where to write the model JSON.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,

    /// Also write the observations as CSV.
    #[arg(long = "data-out", value_name = "CSV")]
    pub data_out: Option<PathBuf>,
}

impl ScalingArgs {
    /// Build the scorecard configuration. Tag and keys are checked later, at fit time.
    pub fn to_config(&self) -> Result<ScorecardConfig, ScorecardError> {
        let params = if self.params.is_empty() {
            None
        } else {
            Some(parse_params(&self.params)?)
        };
        Ok(ScorecardConfig {
            scaling_method: self.scaling_method.clone(),
            scaling_method_params: params,
            intercept_based: self.intercept_based,
            reverse_scorecard: self.reverse_scorecard,
            rounding: self.rounding,
            verbose: self.verbose,
        })
    }
}

/// Parse repeated `KEY=VALUE` pairs; a later duplicate key wins.
pub fn parse_params(raw: &[String]) -> Result<ScalingParams, ScorecardError> {
    raw.iter()
        .map(|item| {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| ScorecardError::config(format!("Parameter '{item}' must be KEY=VALUE.")))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ScorecardError::config(format!("Parameter '{item}' has an empty key.")));
            }
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| ScorecardError::config(format!("Parameter {key} must be numeric; got '{value}'.")))?;
            Ok((key.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn params_parse_into_a_map() {
        let params = parse_params(&strings(&["min=300", " max = 850 "])).unwrap();
        assert_eq!(params.get("min"), Some(&300.0));
        assert_eq!(params.get("max"), Some(&850.0));
    }

    #[test]
    fn non_numeric_param_is_a_config_error() {
        let err = parse_params(&strings(&["pdo=twenty"])).unwrap_err();
        assert!(matches!(err, ScorecardError::InvalidConfig(_)));
        assert!(err.to_string().contains("must be numeric"));
        assert!(parse_params(&strings(&["pdo"])).is_err());
        assert!(parse_params(&strings(&["=1"])).is_err());
    }

    #[test]
    fn build_flags_map_onto_config() {
        let cli = Cli::parse_from([
            "scorecard",
            "build",
            "--model",
            "m.json",
            "--scaling-method",
            "min_max",
            "--param",
            "min=0",
            "--param",
            "max=100",
            "--reverse",
            "--rounding",
            "--style",
            "detailed",
            "--info",
            "2",
        ]);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        let config = args.scaling.to_config().unwrap();
        assert_eq!(config.scaling_method.as_deref(), Some("min_max"));
        assert_eq!(config.scaling_method_params.unwrap().len(), 2);
        assert!(config.reverse_scorecard && config.rounding);
        assert!(!config.intercept_based);
        assert_eq!(args.style, TableStyle::Detailed);
        assert_eq!(args.info, Some(2));
    }

    #[test]
    fn info_level_is_bounded() {
        let res = Cli::try_parse_from(["scorecard", "build", "--model", "m.json", "--info", "3"]);
        assert!(res.is_err());
    }
}
