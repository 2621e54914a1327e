use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use crate::{
    cli::CasesArgs,
    core::batch::evaluate_all,
    jsonl,
    leaderboard,
    prelude::*,
    report::{GeneratorTotals, RunReport},
    tables::build_results_table,
};

#[derive(Parser)]
pub struct EvaluateArgs {
    #[clap(flatten)]
    cases: CasesArgs,

    /// Line-delimited JSON file with one plan per case.
    #[clap(long = "preds", env = "FOOD_TRUCK_PREDICTIONS")]
    predictions: PathBuf,

    /// Report output path.
    #[clap(long = "out", env = "FOOD_TRUCK_REPORT", default_value = "leaderboard/report.json")]
    report: PathBuf,

    /// Model name for the report and the leaderboard.
    #[clap(long, env = "FOOD_TRUCK_MODEL", default_value = "unknown")]
    model: String,

    /// Plan generator metadata with the token, cost, and runtime totals.
    #[clap(long = "meta", env = "FOOD_TRUCK_META")]
    metadata: Option<PathBuf>,

    /// Upsert the average score into the leaderboard.
    #[clap(long)]
    update_leaderboard: bool,

    #[clap(
        long,
        env = "FOOD_TRUCK_LEADERBOARD",
        default_value = "leaderboard/leaderboard.csv"
    )]
    leaderboard: PathBuf,
}

impl EvaluateArgs {
    #[instrument(skip_all, fields(model = %self.model))]
    pub fn run(self) -> Result {
        let cases = jsonl::load(&self.cases.path)?;
        let plans = jsonl::load(&self.predictions)?;
        let metadata = match &self.metadata {
            Some(path) => GeneratorTotals::read(path)?,
            None => None,
        };

        let report = evaluate_all(&cases, &plans);
        println!("{}", build_results_table(&report.results));

        let avg_score = report.avg_score;
        let run_report = RunReport::new(report, self.model, Utc::now(), metadata);
        info!(
            avg_score,
            valid_rate = run_report.metrics.valid_rate,
            constraint_success_rate = run_report.metrics.constraint_success_rate,
            n_missing = run_report.report.missing.len(),
            "scored",
        );
        run_report.write(&self.report)?;

        if self.update_leaderboard {
            leaderboard::update(&self.leaderboard, &run_report.model, avg_score)?;
        }
        Ok(())
    }
}
