use bon::Builder;
use indexmap::IndexMap;

use crate::{
    core::{case::Case, plan::Plan, route::HourLocationMap},
    prelude::*,
};

/// Transient remaining-ingredient tracker, seeded from the purchases.
#[derive(Clone, Debug)]
struct StockLedger<'a>(IndexMap<&'a str, u64>);

impl<'a> StockLedger<'a> {
    fn new(purchases: &'a IndexMap<String, u64>) -> Self {
        Self(purchases.iter().map(|(name, quantity)| (name.as_str(), *quantity)).collect())
    }

    fn remaining(&self, ingredient: &str) -> u64 {
        self.0.get(ingredient).copied().unwrap_or(0)
    }

    /// Maximum number of servings the recipe allows, [`None`] if it is unconstrained.
    fn max_servings(&self, recipe: &IndexMap<String, u64>) -> Option<u64> {
        recipe
            .iter()
            .filter(|(_, required)| **required != 0)
            .map(|(ingredient, required)| self.remaining(ingredient) / required)
            .min()
    }

    /// Take the ingredients for the servings, which must fit into the stock.
    fn consume(&mut self, recipe: &IndexMap<String, u64>, n_servings: u64) {
        for (ingredient, required) in recipe {
            if let Some(remaining) = self.0.get_mut(ingredient.as_str()) {
                *remaining -= n_servings * required;
            }
        }
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Sales {
    pub revenue: f64,

    /// Purchase cost of all the ingredients.
    pub total_cost: f64,

    /// Purchase cost of the ingredients left unsold.
    pub waste_cost: f64,

    /// Units sold per case menu item, in case order.
    pub sold: IndexMap<String, u64>,
}

impl Sales {
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.revenue - self.total_cost
    }
}

/// Greedy single-pass replay of the operating hours.
#[derive(Builder)]
pub struct SalesSimulator<'a> {
    case: &'a Case,
    plan: &'a Plan,
    hour_map: &'a HourLocationMap<'a>,
}

impl SalesSimulator<'_> {
    /// Replay the case hours in case order.
    ///
    /// Within an hour, the menu is served in plan order, so earlier items win scarce shared ingredients.
    #[expect(clippy::cast_precision_loss)]
    pub fn run(&self) -> Sales {
        let mut stock = StockLedger::new(&self.plan.purchases);
        let mut sold: IndexMap<String, u64> =
            self.case.menu_items.keys().map(|item| (item.clone(), 0)).collect();
        let mut revenue = 0.0;

        for hour in &self.case.hours {
            let Some(location) = self.hour_map.location_at(hour) else {
                warn!(%hour, "the hour is not routed, skipping");
                continue;
            };
            let Some(demand) = self.case.demand(location, hour) else {
                trace!(%hour, location, "no demand");
                continue;
            };
            for item in &self.plan.menu {
                let Some(menu_item) = self.case.menu_items.get(item) else {
                    continue;
                };
                let item_demand = demand.get(item).copied().unwrap_or(0);
                let n_sold = stock
                    .max_servings(&menu_item.ingredients)
                    .map_or(item_demand, |max_servings| item_demand.min(max_servings));
                if n_sold == 0 {
                    continue;
                }
                stock.consume(&menu_item.ingredients, n_sold);
                *sold.entry(item.clone()).or_default() += n_sold;
                revenue += n_sold as f64 * menu_item.price;
                trace!(%hour, location, %item, n_sold, "sold");
            }
        }

        Sales {
            revenue,
            total_cost: self.cost_of(&self.plan.purchases),
            waste_cost: self.cost_of(&stock.0),
            sold,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn cost_of<K: AsRef<str>>(&self, quantities: &IndexMap<K, u64>) -> f64 {
        quantities
            .iter()
            .filter_map(|(name, quantity)| {
                let ingredient = self.case.ingredients.get::<str>(name.as_ref())?;
                Some(*quantity as f64 * ingredient.unit_cost)
            })
            .sum()
    }
}
