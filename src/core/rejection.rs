use serde::{Serialize, Serializer, ser::SerializeStruct};

/// Reason a case/plan pair scores zero without being simulated.
#[derive(Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Rejection {
    #[display("missing field: {_0}")]
    MissingField(&'static str),

    #[display("hours empty")]
    EmptyHours,

    /// All required fields are present, but their shapes do not match the case model.
    #[display("malformed case: {_0}")]
    MalformedCase(String),

    #[display("plan must include a non-empty menu, a purchases object, and a non-empty route")]
    MalformedPlan,

    #[display("unknown menu item: {_0}")]
    UnknownMenuItem(String),

    #[display("unknown ingredient: {_0}")]
    UnknownIngredient(String),

    #[display("invalid purchase quantity: {_0}")]
    InvalidPurchaseQuantity(String),

    #[display("route block must have a location and a non-empty list of hours")]
    MalformedRoute,

    #[display("unknown location: {_0}")]
    UnknownLocation(String),

    #[display("hour duplicated in route: {_0}")]
    DuplicateHour(String),

    #[display("route does not cover all hours")]
    IncompleteCoverage,

    #[display("purchase cost exceeds the budget")]
    BudgetExceeded,

    #[display("purchased storage units exceed the capacity")]
    CapacityExceeded,

    #[display("no plan submitted for the case")]
    MissingPlan,
}

impl std::error::Error for Rejection {}

impl Rejection {
    /// Stable snake-case tag reported in the `error` field.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::EmptyHours => "empty_hours",
            Self::MalformedCase(_) => "malformed_case",
            Self::MalformedPlan => "malformed_plan",
            Self::UnknownMenuItem(_) => "unknown_menu_item",
            Self::UnknownIngredient(_) => "unknown_ingredient",
            Self::InvalidPurchaseQuantity(_) => "invalid_purchase_quantity",
            Self::MalformedRoute => "malformed_route",
            Self::UnknownLocation(_) => "unknown_location",
            Self::DuplicateHour(_) => "duplicate_hour",
            Self::IncompleteCoverage => "incomplete_coverage",
            Self::BudgetExceeded => "budget_exceeded",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::MissingPlan => "missing_plan",
        }
    }
}

/// Serialized as `{"error": <tag>, "reason": <message>}`, to be flattened into a result.
impl Serialize for Rejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rejection", 2)?;
        state.serialize_field("error", self.tag())?;
        state.serialize_field("reason", &self.to_string())?;
        state.end()
    }
}
