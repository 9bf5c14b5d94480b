//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the logger
//! - parses CLI arguments
//! - runs the build / score pipelines
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{BuildArgs, Command, DemoArgs, ScoreArgs};
use crate::data::{SyntheticConfig, generate_model};
use crate::domain::TargetKind;
use crate::error::AppError;
use crate::io::{ScorecardFile, write_model_json, write_observations_csv, write_scorecard_csv, write_scorecard_json, write_scores_csv};
use crate::report::{format_information, format_row_errors, format_score_summary, format_table};
use crate::scorecard::compute_raw_points;

pub mod pipeline;

/// Entry point for the `scorecard` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    let verbose = matches!(&cli.command, Command::Build(args) if args.scaling.verbose);
    init_logger(verbose);

    match cli.command {
        Command::Build(args) => handle_build(args),
        Command::Score(args) => handle_score(args),
        Command::Demo(args) => handle_demo(args),
    }
}

/// `warn` by default, `info` with `--verbose`; `RUST_LOG` overrides both.
fn init_logger(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let config = args.scaling.to_config()?;
    let run = pipeline::run_build(&args.model, config.clone())?;
    let fitted = run.fitted()?;

    println!("{}", format_table(&fitted.table, fitted.target, args.style));
    if fitted.intercept != 0.0 {
        println!("Intercept: {:.6}", fitted.intercept);
    }

    if let Some(level) = args.info {
        println!();
        println!("{}", format_information(fitted, &config, level));
    }

    if let Some(path) = &args.export {
        write_scorecard_csv(path, &fitted.table, fitted.target, args.style)?;
    }
    if let Some(path) = &args.export_scorecard {
        write_scorecard_json(path, &ScorecardFile::from_fitted(fitted, &config))?;
    }

    Ok(())
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let run = pipeline::run_score(&args.scorecard, &args.data)?;

    print!("{}", format_score_summary(&run.scores));
    if !run.ingest.row_errors.is_empty() {
        println!(
            "Rejected rows: {} of {}",
            run.ingest.row_errors.len(),
            run.ingest.rows_read
        );
        print!("{}", format_row_errors(&run.ingest.row_errors, args.show_errors));
    }

    match &args.export {
        Some(path) => write_scores_csv(path, &run.ingest.observations, &run.scores)?,
        None => {
            for (i, (obs, score)) in run.ingest.observations.iter().zip(&run.scores).enumerate() {
                let id = obs.id.clone().unwrap_or_else(|| (i + 1).to_string());
                println!("{id}\t{score}");
            }
        }
    }

    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = SyntheticConfig {
        seed: args.seed,
        target: if args.continuous { TargetKind::Continuous } else { TargetKind::Binary },
        n_variables: args.variables,
        n_observations: args.observations,
        ..SyntheticConfig::default()
    };
    let data = generate_model(&config)?;
    write_model_json(&args.out, &data.input)?;
    println!(
        "Wrote model with {} variables to {}",
        data.input.variables.len(),
        args.out.display()
    );

    if let Some(path) = &args.data_out {
        let table = compute_raw_points(&data.input)?;
        write_observations_csv(path, &table, &data.observations)?;
        println!("Wrote {} observations to {}", data.observations.len(), path.display());
    }

    Ok(())
}
