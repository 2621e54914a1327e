use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    core::{
        case::Case,
        constraint::{Compliance, ConstraintScorer},
        plan::Plan,
        rejection::Rejection,
        route::HourLocationMap,
        simulator::SalesSimulator,
    },
    prelude::*,
};

pub const MAX_PROFIT_SCORE: f64 = 60.0;
pub const MAX_WASTE_SCORE: f64 = 20.0;

/// Graded result for a single case.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Evaluation {
    pub id: String,
    pub total_score: f64,

    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Rejected(Rejection),
    Scored(Breakdown),
}

/// Score components and simulation results, rounded for reporting.
#[derive(Clone, Debug, Serialize)]
pub struct Breakdown {
    pub profit: f64,
    pub profit_score: f64,
    pub waste_cost: f64,
    pub waste_score: f64,
    pub constraint_score: f64,
    pub constraint_failures: Vec<String>,
    pub sold: IndexMap<String, u64>,
}

impl Evaluation {
    pub fn rejected(id: impl Into<String>, rejection: Rejection) -> Self {
        Self { id: id.into(), total_score: 0.0, outcome: Outcome::Rejected(rejection) }
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            Outcome::Rejected(rejection) => Some(rejection),
            Outcome::Scored(_) => None,
        }
    }

    #[must_use]
    pub const fn breakdown(&self) -> Option<&Breakdown> {
        match &self.outcome {
            Outcome::Scored(breakdown) => Some(breakdown),
            Outcome::Rejected(_) => None,
        }
    }
}

/// Unrounded score components.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Score {
    pub profit: f64,
    pub waste: f64,
    pub constraint: f64,
}

impl Score {
    #[must_use]
    pub fn total(self) -> f64 {
        self.profit + self.waste + self.constraint
    }
}

/// Purchase totals checked against the budget and the storage capacity.
#[derive(Copy, Clone, Debug)]
struct Procurement {
    cost: f64,
    storage: f64,
}

impl Procurement {
    #[expect(clippy::cast_precision_loss)]
    fn new(case: &Case, plan: &Plan) -> Self {
        plan.purchases
            .iter()
            .filter_map(|(name, quantity)| Some((case.ingredients.get(name)?, *quantity as f64)))
            .fold(Self { cost: 0.0, storage: 0.0 }, |total, (ingredient, quantity)| Self {
                cost: total.cost + quantity * ingredient.unit_cost,
                storage: total.storage + quantity * ingredient.storage_units,
            })
    }

    fn check(self, case: &Case) -> Result<(), Rejection> {
        if self.cost > case.budget {
            Err(Rejection::BudgetExceeded)
        } else if self.storage > case.capacity_units {
            Err(Rejection::CapacityExceeded)
        } else {
            Ok(())
        }
    }
}

/// Validate, simulate, and grade the plan against the case.
///
/// Never fails: every rejection is reported as a zero-score evaluation.
#[instrument(skip_all, fields(id = Case::id_of(case_record)))]
pub fn evaluate_case(case_record: &Value, plan_record: &Value) -> Evaluation {
    let id = Case::id_of(case_record);
    match try_evaluate(case_record, plan_record) {
        Ok((score, breakdown)) => {
            debug!(total = score.total(), "scored");
            Evaluation {
                id: id.to_owned(),
                total_score: round2(score.total()),
                outcome: Outcome::Scored(breakdown),
            }
        }
        Err(rejection) => {
            debug!(%rejection, "rejected");
            Evaluation::rejected(id, rejection)
        }
    }
}

fn try_evaluate(
    case_record: &Value,
    plan_record: &Value,
) -> Result<(Score, Breakdown), Rejection> {
    let case = Case::validate(case_record)?;
    let plan = Plan::validate(&case, plan_record)?;
    Procurement::new(&case, &plan).check(&case)?;

    let hour_map = HourLocationMap::from_route(&plan.route);
    let sales =
        SalesSimulator::builder().case(&case).plan(&plan).hour_map(&hour_map).build().run();
    let Compliance { score: constraint_score, failures } = ConstraintScorer::builder()
        .case(&case)
        .menu(&plan.menu)
        .hour_map(&hour_map)
        .build()
        .score();

    let profit = sales.profit();
    let waste_ratio = sales.waste_cost / sales.total_cost.max(1.0);
    let score = Score {
        profit: case.profit_scale.normalize(profit) * MAX_PROFIT_SCORE,
        waste: (1.0 - waste_ratio).clamp(0.0, 1.0) * MAX_WASTE_SCORE,
        constraint: constraint_score,
    };
    let breakdown = Breakdown {
        profit: round2(profit),
        profit_score: round2(score.profit),
        waste_cost: round2(sales.waste_cost),
        waste_score: round2(score.waste),
        constraint_score: round2(score.constraint),
        constraint_failures: failures,
        sold: sales.sold,
    };
    Ok((score, breakdown))
}

/// Round to 2 decimal places, with exact ties going to the even neighbour.
///
/// A scaled value that lands on a half only by the rounding of the scaling itself
/// is resolved by the sign of the scaling residual instead.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        // Exact thanks to the fused multiply-add:
        let residual = value.mul_add(100.0, -scaled);
        if residual > 0.0 {
            scaled.ceil()
        } else if residual < 0.0 {
            scaled.floor()
        } else {
            scaled.round_ties_even()
        }
    } else {
        scaled.round()
    };
    rounded / 100.0
}
