//! Inference layer: binarizers, classifier backends, the overlap fallback and the predictor.

pub mod artifacts;
pub mod binarizer;
pub mod fallback;
pub mod model;
pub mod predictor;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

#[cfg(feature = "download")]
pub mod download;
#[cfg(feature = "download")]
pub use download::{DownloadError, ensure_artifact};

pub use artifacts::ArtifactPaths;
pub use binarizer::{EncoderError, LabelBinarizer};
pub use fallback::{DEFAULT_MIN_OVERLAP, FallbackIndex, IndexSummary};
pub use model::{CuisineModel, LinearModel};
pub use predictor::Predictor;
