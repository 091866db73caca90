pub mod prediction;
pub mod recipe;
pub mod selection;
pub mod vocab;

pub use prediction::{NO_PREDICTION, Prediction, PredictionSource};
pub use recipe::Recipe;
pub use selection::{MAX_SELECTION, Selection, SelectionError};
pub use vocab::{VEGETABLES, is_vegetable};
