use bon::Builder;
use indexmap::IndexSet;
use serde::Deserialize;

use crate::core::{case::Case, route::HourLocationMap};

/// Compliance score awarded when every constraint passes.
pub const MAX_CONSTRAINT_SCORE: f64 = 20.0;

/// Business constraint of a case.
///
/// Records with an unrecognised type, or with parameters that do not fit their type,
/// are kept as [`Constraint::Unknown`] and always fail.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    Known(Rule),

    Unknown {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl Constraint {
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Known(rule) => rule.kind(),
            Self::Unknown { kind } => kind.as_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// The truck spends at least `min_hours` hours at the location.
    RequiredLocationHours { location: String, min_hours: f64 },

    /// No selected item costs more than `value`.
    MaxPrice { value: f64 },

    /// If the item is on the menu, none of the hours are operated.
    ForbiddenItemHours { item: String, hours: Vec<String> },

    /// If any of the hours is operated, the whole menu is vegan.
    VeganOnlyHours { hours: Vec<String> },

    /// At most `value` distinct items are selected.
    MaxMenuItems { value: f64 },

    MinMenuItems { value: f64 },

    MustIncludeItem { item: String },
}

impl Rule {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RequiredLocationHours { .. } => "required_location_hours",
            Self::MaxPrice { .. } => "max_price",
            Self::ForbiddenItemHours { .. } => "forbidden_item_hours",
            Self::VeganOnlyHours { .. } => "vegan_only_hours",
            Self::MaxMenuItems { .. } => "max_menu_items",
            Self::MinMenuItems { .. } => "min_menu_items",
            Self::MustIncludeItem { .. } => "must_include_item",
        }
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Compliance {
    pub score: f64,

    /// Types of the failed constraints, in case order.
    pub failures: Vec<String>,
}

#[derive(Builder)]
pub struct ConstraintScorer<'a> {
    case: &'a Case,

    /// Plan menu, in plan order and possibly with repetitions.
    menu: &'a [String],

    hour_map: &'a HourLocationMap<'a>,
}

impl ConstraintScorer<'_> {
    pub fn score(&self) -> Compliance {
        if self.case.constraints.is_empty() {
            return Compliance { score: MAX_CONSTRAINT_SCORE, failures: Vec::new() };
        }
        let selected: IndexSet<&str> = self.menu.iter().map(String::as_str).collect();

        let mut n_passed = 0_usize;
        let mut failures = Vec::new();
        for constraint in &self.case.constraints {
            let is_passed = match constraint {
                Constraint::Known(rule) => self.check(rule, &selected),
                Constraint::Unknown { .. } => false,
            };
            if is_passed {
                n_passed += 1;
            } else {
                failures.push(constraint.kind().to_owned());
            }
        }

        #[expect(clippy::cast_precision_loss)]
        let score = n_passed as f64 / self.case.constraints.len() as f64 * MAX_CONSTRAINT_SCORE;
        Compliance { score, failures }
    }

    #[expect(clippy::cast_precision_loss)]
    fn check(&self, rule: &Rule, selected: &IndexSet<&str>) -> bool {
        match rule {
            Rule::RequiredLocationHours { location, min_hours } => {
                self.hour_map.n_hours_at(location) as f64 >= *min_hours
            }
            Rule::MaxPrice { value } => selected
                .iter()
                .filter_map(|item| self.case.menu_items.get(*item))
                .all(|menu_item| menu_item.price <= *value),
            Rule::ForbiddenItemHours { item, hours } => {
                !selected.contains(item.as_str())
                    || hours.iter().all(|hour| !self.hour_map.is_operated(hour))
            }
            Rule::VeganOnlyHours { hours } => {
                !hours.iter().any(|hour| self.hour_map.is_operated(hour))
                    || selected
                        .iter()
                        .filter_map(|item| self.case.menu_items.get(*item))
                        .all(|menu_item| menu_item.is_vegan())
            }
            Rule::MaxMenuItems { value } => selected.len() as f64 <= *value,
            Rule::MinMenuItems { value } => selected.len() as f64 >= *value,
            Rule::MustIncludeItem { item } => selected.contains(item.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::core::{case::Case, fixtures::lunch_case, plan::RouteBlock};

    fn route() -> Vec<RouteBlock> {
        vec![
            RouteBlock { location: "park".to_owned(), hours: vec!["11".to_owned(), "12".to_owned()] },
            RouteBlock { location: "office".to_owned(), hours: vec!["13".to_owned()] },
        ]
    }

    fn score(constraints: Value, menu: &[&str]) -> Compliance {
        let mut record = lunch_case();
        record["constraints"] = constraints;
        let case = Case::validate(&record).unwrap();
        let menu = menu.iter().map(|item| (*item).to_owned()).collect::<Vec<_>>();
        let route = route();
        let hour_map = HourLocationMap::from_route(&route);
        ConstraintScorer::builder().case(&case).menu(&menu).hour_map(&hour_map).build().score()
    }

    fn passes(constraint: Value, menu: &[&str]) -> bool {
        score(json!([constraint]), menu).failures.is_empty()
    }

    #[test]
    fn test_no_constraints() {
        let compliance = score(json!([]), &["burger"]);
        assert_abs_diff_eq!(compliance.score, MAX_CONSTRAINT_SCORE);
        assert!(compliance.failures.is_empty());
    }

    #[test]
    fn test_required_location_hours() {
        let constraint = |min_hours: u64| {
            json!({"type": "required_location_hours", "location": "park", "min_hours": min_hours})
        };
        assert!(passes(constraint(2), &["burger"]));
        assert!(!passes(constraint(3), &["burger"]));
    }

    #[test]
    fn test_max_price() {
        let constraint = json!({"type": "max_price", "value": 9.0});
        assert!(passes(constraint.clone(), &["veggie"]));
        assert!(!passes(constraint, &["veggie", "burger"]));
    }

    #[test]
    fn test_forbidden_item_hours() {
        let constraint = json!({"type": "forbidden_item_hours", "item": "burger", "hours": ["13"]});
        assert!(passes(constraint.clone(), &["veggie"]));
        assert!(!passes(constraint, &["veggie", "burger"]));

        let off_hours = json!({"type": "forbidden_item_hours", "item": "burger", "hours": ["22"]});
        assert!(passes(off_hours, &["burger"]));
    }

    #[test]
    fn test_vegan_only_hours() {
        let constraint = json!({"type": "vegan_only_hours", "hours": ["12"]});
        assert!(passes(constraint.clone(), &["veggie"]));
        assert!(!passes(constraint, &["veggie", "burger"]));

        let off_hours = json!({"type": "vegan_only_hours", "hours": ["22"]});
        assert!(passes(off_hours, &["burger"]));
    }

    #[test]
    fn test_menu_size() {
        let max = json!({"type": "max_menu_items", "value": 1});
        assert!(passes(max.clone(), &["burger", "burger"]));
        assert!(!passes(max, &["burger", "veggie"]));

        let min = json!({"type": "min_menu_items", "value": 2});
        assert!(passes(min.clone(), &["burger", "veggie"]));
        assert!(!passes(min, &["burger", "burger"]));
    }

    #[test]
    fn test_count_parameters_compare_numerically() {
        let compliance = score(
            json!([
                {"type": "required_location_hours", "location": "office", "min_hours": 1.0},
                {"type": "max_menu_items", "value": 3.0},
                {"type": "min_menu_items", "value": 1.5},
                {"type": "min_menu_items", "value": -1},
            ]),
            &["burger", "veggie"],
        );
        assert_abs_diff_eq!(compliance.score, MAX_CONSTRAINT_SCORE);
        assert!(compliance.failures.is_empty());

        assert!(!passes(json!({"type": "max_menu_items", "value": -1}), &["burger"]));
        assert!(!passes(
            json!({"type": "required_location_hours", "location": "park", "min_hours": 2.5}),
            &["burger"],
        ));
    }

    #[test]
    fn test_must_include_item() {
        let constraint = json!({"type": "must_include_item", "item": "veggie"});
        assert!(passes(constraint.clone(), &["burger", "veggie"]));
        assert!(!passes(constraint, &["burger"]));
    }

    #[test]
    fn test_unknown_type_always_fails() {
        assert!(!passes(json!({"type": "no_rain"}), &["burger"]));
    }

    #[test]
    fn test_ill_typed_parameters_fail() {
        let compliance = score(json!([{"type": "max_price", "value": "cheap"}]), &["burger"]);
        assert_eq!(compliance.failures, ["max_price"]);
    }

    #[test]
    fn test_partial_score_keeps_duplicate_failures() {
        let compliance = score(
            json!([
                {"type": "must_include_item", "item": "taco"},
                {"type": "max_menu_items", "value": 5},
                {"type": "must_include_item", "item": "wrap"},
                {"type": "min_menu_items", "value": 1},
            ]),
            &["burger"],
        );
        assert_abs_diff_eq!(compliance.score, 10.0);
        assert_eq!(compliance.failures, ["must_include_item", "must_include_item"]);
    }
}
