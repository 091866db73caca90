//! Classifier backends.
//!
//! The predictor only sees [`CuisineModel`]: a presence vector in, a label
//! vector out. [`LinearModel`] is the pure-Rust backend; the ONNX backend
//! lives behind the `onnx` feature.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A pre-fit multi-label classifier.
pub trait CuisineModel: Send + Sync {
    /// Map an ingredient presence vector to a cuisine label vector.
    ///
    /// The output has one entry per cuisine class; non-zero means present.
    /// An all-zero output means the model abstains.
    fn predict(&self, features: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Input width the model was fitted on, if it can tell.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Output width (number of cuisine classes), if it can tell.
    fn n_labels(&self) -> Option<usize> {
        None
    }

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

impl<M: CuisineModel + ?Sized> CuisineModel for Box<M> {
    fn predict(&self, features: &[u8]) -> anyhow::Result<Vec<u8>> {
        (**self).predict(features)
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }

    fn n_labels(&self) -> Option<usize> {
        (**self).n_labels()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// One-vs-rest linear classifier.
///
/// Label `j` is set when `coefficients[j] · x + intercepts[j] > 0`, which is
/// the decision rule of a logistic-regression one-vs-rest ensemble
/// thresholded at probability 0.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// `[n_labels][n_features]`
    coefficients: Vec<Vec<f32>>,
    /// `[n_labels]`
    intercepts: Vec<f32>,
}

impl LinearModel {
    pub fn new(coefficients: Vec<Vec<f32>>, intercepts: Vec<f32>) -> anyhow::Result<Self> {
        let model = Self {
            coefficients,
            intercepts,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load exported weights from JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "model not found: {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading model {}", path.display()))?;
        let model: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing model {}", path.display()))?;
        model
            .validate()
            .with_context(|| format!("invalid model {}", path.display()))?;

        info!(
            labels = model.n_labels(),
            features = model.width(),
            path = %path.display(),
            "loaded linear model"
        );
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn n_labels(&self) -> usize {
        self.intercepts.len()
    }

    fn width(&self) -> usize {
        self.coefficients.first().map(|row| row.len()).unwrap_or(0)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.coefficients.len() == self.intercepts.len(),
            "{} coefficient rows but {} intercepts",
            self.coefficients.len(),
            self.intercepts.len()
        );
        let width = self.width();
        for (j, row) in self.coefficients.iter().enumerate() {
            anyhow::ensure!(
                row.len() == width,
                "coefficient row {j} has width {}, expected {width}",
                row.len()
            );
        }
        Ok(())
    }
}

impl CuisineModel for LinearModel {
    fn predict(&self, features: &[u8]) -> anyhow::Result<Vec<u8>> {
        anyhow::ensure!(
            features.len() == self.width(),
            "input has width {}, model expects {}",
            features.len(),
            self.width()
        );

        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, &bias)| {
                let score: f32 = row
                    .iter()
                    .zip(features)
                    .filter(|(_, x)| **x != 0)
                    .map(|(w, _)| w)
                    .sum::<f32>()
                    + bias;
                u8::from(score > 0.0)
            })
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.width())
    }

    fn n_labels(&self) -> Option<usize> {
        Some(self.intercepts.len())
    }

    fn name(&self) -> &str {
        "linear"
    }
}
