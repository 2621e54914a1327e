mod evaluate;
mod validate;

use clap::{Parser, Subcommand};

use crate::{
    cli::{evaluate::EvaluateArgs, validate::ValidateArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn run(self) -> Result {
        match self.command {
            Command::Evaluate(args) => args.run(),
            Command::Validate(args) => args.run(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Score the predicted plans against the cases and write the report.
    #[clap(name = "evaluate")]
    Evaluate(Box<EvaluateArgs>),

    /// Check the cases, and optionally the predicted plans, without scoring.
    #[clap(name = "validate")]
    Validate(Box<ValidateArgs>),
}

#[derive(Parser)]
pub struct CasesArgs {
    /// Line-delimited JSON file with the cases.
    #[clap(
        long = "cases",
        env = "FOOD_TRUCK_CASES",
        default_value = "data/food_truck_ops_cases.jsonl"
    )]
    pub path: std::path::PathBuf,
}
