//! Prediction results.

use std::fmt;

use serde::Serialize;

/// Text shown when no cuisine can be determined.
pub const NO_PREDICTION: &str = "No prediction available (try different ingredients)";

/// Which stage produced a cuisine label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// The classifier labelled the selection.
    Model,
    /// The classifier abstained and the overlap heuristic picked a cuisine.
    Fallback,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

/// Outcome of a single prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prediction {
    Cuisine {
        label: String,
        source: PredictionSource,
    },
    NoPrediction,
}

impl Prediction {
    pub fn from_model(label: impl Into<String>) -> Self {
        Self::Cuisine {
            label: label.into(),
            source: PredictionSource::Model,
        }
    }

    pub fn from_fallback(label: impl Into<String>) -> Self {
        Self::Cuisine {
            label: label.into(),
            source: PredictionSource::Fallback,
        }
    }

    /// The cuisine label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Cuisine { label, .. } => Some(label),
            Self::NoPrediction => None,
        }
    }

    pub fn source(&self) -> Option<PredictionSource> {
        match self {
            Self::Cuisine { source, .. } => Some(*source),
            Self::NoPrediction => None,
        }
    }
}

/// Renders the label, or [`NO_PREDICTION`].
impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cuisine { label, .. } => f.write_str(label),
            Self::NoPrediction => f.write_str(NO_PREDICTION),
        }
    }
}
