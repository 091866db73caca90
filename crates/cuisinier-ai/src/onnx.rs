//! ONNX Runtime classifier backend.
//!
//! Expects a classifier exported to ONNX with a single float input of shape
//! `[batch, n_features]` whose first output is the `[batch, n_labels]` int64
//! label indicator matrix.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::model::CuisineModel;

pub struct OnnxModel {
    session: Mutex<Session>,
    n_features: Option<usize>,
    n_labels: Option<usize>,
}

impl OnnxModel {
    /// Load a classifier from an `.onnx` file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "model not found: {}", path.display());

        let session = Session::builder()?.commit_from_file(path)?;
        let n_features = infer_width(session.inputs()[0].dtype());
        let n_labels = infer_width(session.outputs()[0].dtype());

        info!(features = ?n_features, labels = ?n_labels, model = %path.display(), "loaded onnx model");
        Ok(Self {
            session: Mutex::new(session),
            n_features,
            n_labels,
        })
    }
}

impl CuisineModel for OnnxModel {
    fn predict(&self, features: &[u8]) -> anyhow::Result<Vec<u8>> {
        let input: Vec<f32> = features.iter().map(|&x| f32::from(x)).collect();
        let shape = [1i64, input.len() as i64];
        let tensor = Tensor::from_array((shape, input.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("onnx session lock poisoned"))?;
        let outputs = session.run(ort::inputs![tensor])?;

        let (out_shape, labels) = outputs[0].try_extract_tensor::<i64>()?;
        let dims: &[i64] = out_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] == 1,
            "unexpected output shape: {dims:?}, expected [1, n_labels]"
        );

        Ok(labels.iter().map(|&v| u8::from(v != 0)).collect())
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn n_labels(&self) -> Option<usize> {
        self.n_labels
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Last dimension of a tensor shape, when it is static.
fn infer_width(value_type: &ort::value::ValueType) -> Option<usize> {
    match value_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
