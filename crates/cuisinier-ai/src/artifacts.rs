//! Startup artifact loading.
//!
//! Everything the predictor needs is read here, once. Any missing or
//! malformed artifact is an error; there is no degraded mode.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cuisinier_core::VEGETABLES;
use tracing::info;

use crate::binarizer::LabelBinarizer;
use crate::fallback::FallbackIndex;
use crate::model::{CuisineModel, LinearModel};
use crate::predictor::Predictor;

/// Locations of the startup artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// `.onnx` (with the `onnx` feature) or linear-model JSON.
    pub model: PathBuf,
    pub ingredient_encoder: PathBuf,
    pub cuisine_encoder: PathBuf,
    /// JSON array of recipes used to build the fallback index.
    pub corpus: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/model.json"),
            ingredient_encoder: PathBuf::from("models/mlb_ingredients.json"),
            cuisine_encoder: PathBuf::from("models/mlb_cuisine.json"),
            corpus: PathBuf::from("data/train.json"),
        }
    }
}

/// Load a model, picking the backend from the file extension.
pub fn load_model(path: &Path) -> anyhow::Result<Box<dyn CuisineModel>> {
    let is_onnx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"));

    if is_onnx {
        #[cfg(feature = "onnx")]
        return Ok(Box::new(crate::onnx::OnnxModel::load(path)?));

        #[cfg(not(feature = "onnx"))]
        anyhow::bail!(
            "{} is an ONNX model but this build lacks the `onnx` feature",
            path.display()
        );
    }

    Ok(Box::new(LinearModel::load(path)?))
}

impl Predictor {
    /// Load all artifacts and assemble a predictor.
    pub fn load(paths: &ArtifactPaths) -> anyhow::Result<Self> {
        let model = load_model(&paths.model).context("loading model")?;
        let ingredients =
            LabelBinarizer::load(&paths.ingredient_encoder).context("loading ingredient encoder")?;
        let cuisines =
            LabelBinarizer::load(&paths.cuisine_encoder).context("loading cuisine encoder")?;
        let fallback = FallbackIndex::from_corpus_file(&paths.corpus, VEGETABLES)
            .context("building fallback index")?;

        info!(
            model = model.name(),
            cuisines = cuisines.width(),
            fallback_cuisines = fallback.len(),
            "predictor ready"
        );
        Predictor::new(model, ingredients, cuisines, fallback)
    }
}
