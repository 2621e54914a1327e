use std::{collections::HashMap, path::PathBuf};

use clap::Parser;

use crate::{
    cli::CasesArgs,
    core::{case::Case, plan::Plan},
    jsonl,
    prelude::*,
};

#[derive(Parser)]
pub struct ValidateArgs {
    #[clap(flatten)]
    cases: CasesArgs,

    /// Also check the plans in this line-delimited JSON file against their cases.
    #[clap(long = "preds", env = "FOOD_TRUCK_PREDICTIONS")]
    predictions: Option<PathBuf>,
}

impl ValidateArgs {
    pub fn run(self) -> Result {
        let cases = jsonl::load(&self.cases.path)?;
        let plans = match &self.predictions {
            Some(path) => jsonl::load(path)?,
            None => Vec::new(),
        };
        let plans = plans
            .iter()
            .filter_map(|plan| Some((Plan::id_of(plan)?, plan)))
            .collect::<HashMap<_, _>>();

        let mut n_failures = 0_usize;
        for record in &cases {
            let id = Case::id_of(record);
            let case = match Case::validate(record) {
                Ok(case) => case,
                Err(rejection) => {
                    println!("{id}: {rejection}");
                    n_failures += 1;
                    continue;
                }
            };
            if self.predictions.is_none() {
                continue;
            }
            match plans.get(id) {
                Some(plan) => {
                    if let Err(rejection) = Plan::validate(&case, plan) {
                        println!("{id}: plan: {rejection}");
                        n_failures += 1;
                    }
                }
                None => {
                    println!("{id}: plan: missing");
                    n_failures += 1;
                }
            }
        }

        ensure!(n_failures == 0, "{n_failures} validation failure(s)");
        info!("validated {} cases", cases.len());
        Ok(())
    }
}
