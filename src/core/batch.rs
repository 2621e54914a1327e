use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::{
    core::{
        case::Case,
        evaluation::{Evaluation, evaluate_case, round2},
        plan::Plan,
        rejection::Rejection,
    },
    prelude::*,
};

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    /// Mean total score over all cases, zero without cases.
    pub avg_score: f64,

    /// One evaluation per case, in case order.
    pub results: Vec<Evaluation>,

    /// Identifiers of the cases without a plan, in case order.
    pub missing: Vec<String>,
}

/// Pair every case with its plan by identifier and grade them.
///
/// Plans without an identifier are ignored; the last plan wins for a repeated identifier.
#[instrument(skip_all, fields(n_cases = cases.len(), n_plans = plans.len()))]
pub fn evaluate_all(cases: &[Value], plans: &[Value]) -> Report {
    let plans: HashMap<&str, &Value> =
        plans.iter().filter_map(|plan| Some((Plan::id_of(plan)?, plan))).collect();

    let mut results = Vec::with_capacity(cases.len());
    let mut missing = Vec::new();
    for case in cases {
        let id = Case::id_of(case);
        if let Some(plan) = plans.get(id) {
            results.push(evaluate_case(case, plan));
        } else {
            debug!(id, "missing plan");
            missing.push(id.to_owned());
            results.push(Evaluation::rejected(id, Rejection::MissingPlan));
        }
    }

    #[expect(clippy::cast_precision_loss)]
    let avg_score = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|result| result.total_score).sum::<f64>() / results.len() as f64
    };
    info!(avg_score, n_missing = missing.len(), "evaluated");

    Report { avg_score: round2(avg_score), results, missing }
}
