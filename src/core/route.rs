use indexmap::IndexMap;

use crate::core::plan::RouteBlock;

/// Location the truck occupies during each routed hour.
#[must_use]
#[derive(Debug, Default)]
pub struct HourLocationMap<'a>(IndexMap<&'a str, &'a str>);

impl<'a> HourLocationMap<'a> {
    /// Map every hour of every block onto the block's location.
    ///
    /// Expects validated routes: with duplicate hours, the last block wins.
    pub fn from_route(route: &'a [RouteBlock]) -> Self {
        Self(
            route
                .iter()
                .flat_map(|block| {
                    block.hours.iter().map(|hour| (hour.as_str(), block.location.as_str()))
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn location_at(&self, hour: &str) -> Option<&'a str> {
        self.0.get(hour).copied()
    }

    #[must_use]
    pub fn is_operated(&self, hour: &str) -> bool {
        self.0.contains_key(hour)
    }

    #[must_use]
    pub fn n_hours_at(&self, location: &str) -> usize {
        self.0.values().filter(|value| **value == location).count()
    }
}
