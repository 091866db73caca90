//! Training corpus records.

use serde::{Deserialize, Serialize};

/// One recipe from the training corpus.
///
/// The corpus is a JSON array of these, e.g.
/// `{"id": 10259, "cuisine": "greek", "ingredients": ["romaine lettuce", ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<u64>,
    pub cuisine: String,
    pub ingredients: Vec<String>,
}
