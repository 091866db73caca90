//! The closed vegetable vocabulary offered to users.
//!
//! Fallback index scans walk it front to back.

/// The 19 known vegetables, lowercase, in canonical order.
pub const VEGETABLES: &[&str] = &[
    "lettuce",
    "carrot",
    "onion",
    "tomato",
    "spinach",
    "cucumber",
    "peas",
    "green beans",
    "zucchini",
    "eggplant",
    "broccoli",
    "cauliflower",
    "cabbage",
    "mushroom",
    "corn",
    "potato",
    "asparagus",
    "celery",
    "beetroot",
];

/// Whether `name` is one of the [`VEGETABLES`] (exact, lowercase match).
pub fn is_vegetable(name: &str) -> bool {
    VEGETABLES.contains(&name)
}
