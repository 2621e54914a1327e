use serde_json::{Value, json};

/// One hour, one location, one item.
pub fn burger_case() -> Value {
    json!({
        "id": "case-1",
        "hours": ["H"],
        "budget": 100,
        "capacity_units": 100,
        "locations": [{"name": "L", "hourly_demand": {"H": {"burger": 5}}}],
        "menu_items": [
            {"item": "burger", "price": 10, "diet": "meat", "ingredients": {"bun": 1}},
        ],
        "ingredients": [{"name": "bun", "unit_cost": 1, "storage_units": 1}],
        "constraints": [],
        "profit_scale": {"floor": 0, "target": 50},
    })
}

pub fn burger_plan() -> Value {
    json!({
        "id": "case-1",
        "menu": [{"item": "burger"}],
        "purchases": {"bun": 5},
        "route": [{"location": "L", "hours": ["H"]}],
    })
}

/// Three hours, two locations, and two items sharing the buns.
pub fn lunch_case() -> Value {
    json!({
        "id": "lunch",
        "hours": ["11", "12", "13"],
        "budget": 200,
        "capacity_units": 100,
        "locations": [
            {
                "name": "park",
                "hourly_demand": {
                    "11": {"burger": 2, "veggie": 3},
                    "12": {"burger": 2, "veggie": 1},
                    "13": {"burger": 1},
                },
            },
            {
                "name": "office",
                "hourly_demand": {
                    "11": {"burger": 4},
                    "12": {"burger": 4},
                    "13": {"burger": 5, "veggie": 2},
                },
            },
        ],
        "menu_items": [
            {"item": "burger", "price": 10.0, "diet": "meat", "ingredients": {"bun": 1, "patty": 1}},
            {"item": "veggie", "price": 8.0, "diet": "vegan", "ingredients": {"bun": 1, "tofu": 1}},
        ],
        "ingredients": [
            {"name": "bun", "unit_cost": 1.0, "storage_units": 1},
            {"name": "patty", "unit_cost": 2.0, "storage_units": 2},
            {"name": "tofu", "unit_cost": 2.0, "storage_units": 1},
        ],
        "constraints": [],
        "profit_scale": {"floor": 0, "target": 100},
    })
}

pub fn lunch_plan() -> Value {
    json!({
        "id": "lunch",
        "menu": [{"item": "burger"}, {"item": "veggie"}],
        "purchases": {"bun": 10, "patty": 6, "tofu": 4},
        "route": [
            {"location": "park", "hours": ["11", "12"]},
            {"location": "office", "hours": ["13"]},
        ],
    })
}
