use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::{constraint::Constraint, rejection::Rejection};

/// Top-level keys every case record must carry.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "id",
    "hours",
    "budget",
    "capacity_units",
    "locations",
    "menu_items",
    "ingredients",
    "constraints",
    "profit_scale",
];

/// Scenario a plan is graded against.
#[derive(Clone, Debug, Deserialize)]
pub struct Case {
    pub id: String,

    /// Scoring timeline, in replay order.
    pub hours: Vec<String>,

    /// Maximum total purchase cost.
    pub budget: f64,

    /// Maximum total storage units of purchased ingredients.
    pub capacity_units: f64,

    #[serde(deserialize_with = "by_name")]
    pub locations: IndexMap<String, Location>,

    #[serde(deserialize_with = "by_name")]
    pub menu_items: IndexMap<String, MenuItem>,

    #[serde(deserialize_with = "by_name")]
    pub ingredients: IndexMap<String, Ingredient>,

    pub constraints: Vec<Constraint>,

    pub profit_scale: ProfitScale,
}

impl Case {
    /// Check the required fields and read the record into a typed case.
    pub fn validate(record: &Value) -> Result<Self, Rejection> {
        for field in REQUIRED_FIELDS {
            if record.get(field).is_none() {
                return Err(Rejection::MissingField(field));
            }
        }
        if record["hours"].as_array().is_some_and(Vec::is_empty) {
            return Err(Rejection::EmptyHours);
        }
        Self::deserialize(record).map_err(|error| Rejection::MalformedCase(error.to_string()))
    }

    /// Case identifier for reporting, `unknown` when absent.
    #[must_use]
    pub fn id_of(record: &Value) -> &str {
        record.get("id").and_then(Value::as_str).unwrap_or("unknown")
    }

    /// Demand for the items at the location during the hour.
    ///
    /// Items and hours absent from the demand table have no demand.
    pub fn demand(&self, location: &str, hour: &str) -> Option<&IndexMap<String, u64>> {
        self.locations.get(location)?.hourly_demand.get(hour)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Location {
    pub name: String,

    /// Hour → item → demand quantity.
    #[serde(default)]
    pub hourly_demand: IndexMap<String, IndexMap<String, u64>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MenuItem {
    pub item: String,
    pub price: f64,
    pub diet: String,

    /// Recipe: ingredient → quantity required per serving.
    #[serde(default)]
    pub ingredients: IndexMap<String, u64>,
}

impl MenuItem {
    #[must_use]
    pub fn is_vegan(&self) -> bool {
        self.diet == "vegan"
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub unit_cost: f64,
    pub storage_units: f64,
}

/// Profit normalization bounds.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct ProfitScale {
    pub floor: f64,
    pub target: f64,
}

impl ProfitScale {
    /// Profit mapped onto `[0, 1]`.
    #[must_use]
    pub fn normalize(self, profit: f64) -> f64 {
        ((profit - self.floor) / (self.target - self.floor).max(1.0)).clamp(0.0, 1.0)
    }
}

trait Named {
    fn name(&self) -> &str;
}

impl Named for Location {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for MenuItem {
    fn name(&self) -> &str {
        &self.item
    }
}

impl Named for Ingredient {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Read a list of records into a lookup keyed by name.
///
/// A repeated name keeps its first position and takes the last record.
fn by_name<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Named,
{
    Ok(Vec::<T>::deserialize(deserializer)?
        .into_iter()
        .map(|record| (record.name().to_owned(), record))
        .collect())
}
