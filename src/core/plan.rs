use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::core::{case::Case, rejection::Rejection};

/// Validated candidate submission for a case.
#[derive(Clone, Debug)]
pub struct Plan {
    /// Offered items in priority order.
    pub menu: Vec<String>,

    /// Purchased quantity per ingredient.
    pub purchases: IndexMap<String, u64>,

    pub route: Vec<RouteBlock>,
}

/// One location held for a set of hours.
#[derive(Clone, Debug)]
pub struct RouteBlock {
    pub location: String,
    pub hours: Vec<String>,
}

impl Plan {
    /// Check the plan record against the case and read it into a typed plan.
    ///
    /// Stops at the first problem found.
    pub fn validate(case: &Case, record: &Value) -> Result<Self, Rejection> {
        let (Some(menu), Some(purchases), Some(route)) =
            (record.get("menu"), record.get("purchases"), record.get("route"))
        else {
            return Err(Rejection::MalformedPlan);
        };
        let menu = Self::validate_menu(case, menu)?;
        let purchases = Self::validate_purchases(case, purchases)?;
        let route = Self::validate_route(case, route)?;
        Ok(Self { menu, purchases, route })
    }

    fn validate_menu(case: &Case, menu: &Value) -> Result<Vec<String>, Rejection> {
        let entries = non_empty_array(menu).ok_or(Rejection::MalformedPlan)?;
        entries
            .iter()
            .map(|entry| {
                let item = entry.get("item").ok_or(Rejection::MalformedPlan)?;
                match item.as_str() {
                    Some(item) if case.menu_items.contains_key(item) => Ok(item.to_owned()),
                    _ => Err(Rejection::UnknownMenuItem(display_name(item))),
                }
            })
            .collect()
    }

    fn validate_purchases(
        case: &Case,
        purchases: &Value,
    ) -> Result<IndexMap<String, u64>, Rejection> {
        let purchases = purchases.as_object().ok_or(Rejection::MalformedPlan)?;
        purchases
            .iter()
            .map(|(name, quantity)| {
                if !case.ingredients.contains_key(name) {
                    return Err(Rejection::UnknownIngredient(name.clone()));
                }
                let quantity = quantity
                    .as_u64()
                    .ok_or_else(|| Rejection::InvalidPurchaseQuantity(name.clone()))?;
                Ok((name.clone(), quantity))
            })
            .collect()
    }

    fn validate_route(case: &Case, route: &Value) -> Result<Vec<RouteBlock>, Rejection> {
        let blocks = non_empty_array(route).ok_or(Rejection::MalformedPlan)?;

        let mut assigned_hours = IndexSet::new();
        let mut route = Vec::with_capacity(blocks.len());
        for block in blocks {
            let block = block.as_object().ok_or(Rejection::MalformedRoute)?;
            let (Some(location), Some(hours)) = (block.get("location"), block.get("hours")) else {
                return Err(Rejection::MalformedRoute);
            };
            let Some(location) =
                location.as_str().filter(|name| case.locations.contains_key(*name))
            else {
                return Err(Rejection::UnknownLocation(display_name(location)));
            };
            let hours = non_empty_array(hours)
                .ok_or(Rejection::MalformedRoute)?
                .iter()
                .map(|hour| hour.as_str().map(str::to_owned).ok_or(Rejection::MalformedRoute))
                .collect::<Result<Vec<_>, _>>()?;
            for hour in &hours {
                if !assigned_hours.insert(hour.clone()) {
                    return Err(Rejection::DuplicateHour(hour.clone()));
                }
            }
            route.push(RouteBlock { location: location.to_owned(), hours });
        }

        if case.hours.iter().all(|hour| assigned_hours.contains(hour)) {
            Ok(route)
        } else {
            Err(Rejection::IncompleteCoverage)
        }
    }

    /// Plan identifier, if the record carries one.
    #[must_use]
    pub fn id_of(record: &Value) -> Option<&str> {
        record.get("id").and_then(Value::as_str)
    }
}

fn non_empty_array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array().filter(|array| !array.is_empty())
}

/// Name as reported in a rejection: the string itself, or the JSON text of any other value.
fn display_name(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::fixtures::{burger_plan, lunch_case, lunch_plan};

    fn validate(plan: &Value) -> Result<Plan, Rejection> {
        let case = Case::validate(&lunch_case()).unwrap();
        Plan::validate(&case, plan)
    }

    fn rejection(patch: impl FnOnce(&mut Value)) -> Rejection {
        let mut plan = lunch_plan();
        patch(&mut plan);
        validate(&plan).unwrap_err()
    }

    #[test]
    fn test_validate_ok() -> Result<(), Rejection> {
        let plan = validate(&lunch_plan())?;
        assert_eq!(plan.menu, ["burger", "veggie"]);
        assert_eq!(plan.purchases["bun"], 10);
        assert_eq!(plan.route.len(), 2);
        assert_eq!(plan.route[1].location, "office");
        Ok(())
    }

    #[test]
    fn test_missing_keys() {
        for key in ["menu", "purchases", "route"] {
            let rejection = rejection(|plan| {
                plan.as_object_mut().unwrap().remove(key);
            });
            assert_eq!(rejection, Rejection::MalformedPlan, "{key}");
        }
    }

    #[test]
    fn test_wrong_container_shapes() {
        let patches = [
            ("menu", json!([])),
            ("menu", json!({"item": "burger"})),
            ("menu", json!([{"name": "burger"}])),
            ("purchases", json!([["bun", 1]])),
            ("route", json!([])),
            ("route", json!({"location": "park", "hours": ["11", "12", "13"]})),
        ];
        for (key, value) in patches {
            assert_eq!(rejection(|plan| plan[key] = value.clone()), Rejection::MalformedPlan);
        }
    }

    #[test]
    fn test_unknown_menu_item() {
        assert_eq!(
            rejection(|plan| plan["menu"] = json!([{"item": "burger"}, {"item": "fries"}])),
            Rejection::UnknownMenuItem("fries".to_owned())
        );
    }

    #[test]
    fn test_unknown_ingredient() {
        assert_eq!(
            rejection(|plan| plan["purchases"]["cheese"] = json!(1)),
            Rejection::UnknownIngredient("cheese".to_owned())
        );
    }

    #[test]
    fn test_non_string_menu_item() {
        assert_eq!(
            rejection(|plan| plan["menu"] = json!([{"item": 7}])),
            Rejection::UnknownMenuItem("7".to_owned())
        );
    }

    /// Purchases are checked in submission order, not in key order.
    #[test]
    fn test_purchases_are_checked_in_submission_order() {
        assert_eq!(
            rejection(|plan| plan["purchases"] = json!({"zzz": 1, "bun": -1})),
            Rejection::UnknownIngredient("zzz".to_owned())
        );
        assert_eq!(
            rejection(|plan| plan["purchases"] = json!({"tofu": -1, "apple": 1})),
            Rejection::InvalidPurchaseQuantity("tofu".to_owned())
        );
    }

    #[test]
    fn test_invalid_purchase_quantity() {
        for quantity in [json!(-1), json!(1.5), json!("3"), json!(null)] {
            assert_eq!(
                rejection(|plan| plan["purchases"]["bun"] = quantity.clone()),
                Rejection::InvalidPurchaseQuantity("bun".to_owned()),
                "{quantity}",
            );
        }
    }

    #[test]
    fn test_malformed_route() {
        let routes = [
            json!([{"location": "park"}]),
            json!([{"hours": ["11"]}]),
            json!([{"location": "park", "hours": []}]),
            json!([{"location": "park", "hours": "11"}]),
            json!([{"location": "park", "hours": [11]}]),
            json!(["park"]),
        ];
        for route in routes {
            assert_eq!(
                rejection(|plan| plan["route"] = route.clone()),
                Rejection::MalformedRoute,
                "{route}",
            );
        }
    }

    #[test]
    fn test_unknown_location() {
        assert_eq!(
            rejection(|plan| plan["route"][0]["location"] = json!("beach")),
            Rejection::UnknownLocation("beach".to_owned())
        );
        assert_eq!(
            rejection(|plan| plan["route"][0]["location"] = json!(null)),
            Rejection::UnknownLocation("null".to_owned())
        );
    }

    #[test]
    fn test_duplicate_hour() {
        assert_eq!(
            rejection(|plan| plan["route"][1]["hours"] = json!(["12", "13"])),
            Rejection::DuplicateHour("12".to_owned())
        );
    }

    #[test]
    fn test_incomplete_coverage() {
        assert_eq!(
            rejection(|plan| plan["route"][1]["hours"] = json!(["14"])),
            Rejection::IncompleteCoverage
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let rejection = rejection(|plan| {
            plan["menu"] = json!([{"item": "fries"}]);
            plan["purchases"]["cheese"] = json!(1);
        });
        assert_eq!(rejection, Rejection::UnknownMenuItem("fries".to_owned()));
    }

    #[test]
    fn test_id_of() {
        assert_eq!(Plan::id_of(&burger_plan()), Some("case-1"));
        assert_eq!(Plan::id_of(&json!({"menu": []})), None);
    }
}
