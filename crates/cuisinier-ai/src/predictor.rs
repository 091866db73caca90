//! Cuisine prediction: encode -> classify -> decode -> fallback.

use cuisinier_core::{Prediction, Selection, VEGETABLES};
use tracing::{debug, warn};

use crate::binarizer::LabelBinarizer;
use crate::fallback::{DEFAULT_MIN_OVERLAP, FallbackIndex};
use crate::model::CuisineModel;

/// Predicts a cuisine for a vegetable selection.
///
/// Owns the model, both encoders and the fallback index. All of them are
/// built before the predictor and never change afterwards, so a predictor
/// can be shared across threads behind an `Arc`.
pub struct Predictor {
    model: Box<dyn CuisineModel>,
    ingredients: LabelBinarizer,
    cuisines: LabelBinarizer,
    fallback: FallbackIndex,
    min_overlap: usize,
}

impl Predictor {
    /// Assemble a predictor from its parts.
    ///
    /// Fails when the model reports a feature width different from the
    /// ingredient encoder's, or a label width different from the cuisine
    /// encoder's.
    pub fn new(
        model: Box<dyn CuisineModel>,
        ingredients: LabelBinarizer,
        cuisines: LabelBinarizer,
        fallback: FallbackIndex,
    ) -> anyhow::Result<Self> {
        if let Some(width) = model.n_features() {
            anyhow::ensure!(
                width == ingredients.width(),
                "{} model expects {width} features, ingredient encoder has {}",
                model.name(),
                ingredients.width()
            );
        }
        if let Some(width) = model.n_labels() {
            anyhow::ensure!(
                width == cuisines.width(),
                "{} model outputs {width} labels, cuisine encoder has {}",
                model.name(),
                cuisines.width()
            );
        }

        for veg in VEGETABLES {
            if !ingredients.contains(veg) {
                warn!(vegetable = *veg, "vegetable unknown to ingredient encoder");
            }
        }

        Ok(Self {
            model,
            ingredients,
            cuisines,
            fallback,
            min_overlap: DEFAULT_MIN_OVERLAP,
        })
    }

    /// Override the minimum overlap the fallback requires.
    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    pub fn fallback_index(&self) -> &FallbackIndex {
        &self.fallback
    }

    /// Predict a cuisine for `selection`.
    ///
    /// Returns the classifier's first decoded label when it has one, else the
    /// fallback's best match, else [`Prediction::NoPrediction`].
    pub fn predict(&self, selection: &Selection) -> Prediction {
        if selection.is_empty() {
            return Prediction::NoPrediction;
        }

        if let Some(label) = self.classify(selection) {
            debug!(label = %label, "model prediction");
            return Prediction::from_model(label);
        }

        match self.fallback.best_match(selection, self.min_overlap) {
            Some(cuisine) => Prediction::from_fallback(cuisine),
            None => Prediction::NoPrediction,
        }
    }

    /// First non-empty label the model assigns, or `None` if it abstains.
    ///
    /// Inference or decode failures count as abstention.
    fn classify(&self, selection: &Selection) -> Option<String> {
        let features = self.ingredients.transform(selection.items());

        let output = match self.model.predict(&features) {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, model = self.model.name(), "inference failed, using fallback");
                return None;
            }
        };

        let labels = match self.cuisines.inverse_transform(&output) {
            Ok(labels) => labels,
            Err(e) => {
                warn!(error = %e, "could not decode model output, using fallback");
                return None;
            }
        };

        labels.into_iter().find(|label| !label.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuisinier_core::PredictionSource;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed output and counts calls.
    struct FixedModel {
        output: Vec<u8>,
        calls: Arc<AtomicUsize>,
    }

    impl CuisineModel for FixedModel {
        fn predict(&self, _features: &[u8]) -> anyhow::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingModel;

    impl CuisineModel for FailingModel {
        fn predict(&self, _features: &[u8]) -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("session exploded")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn cuisines() -> LabelBinarizer {
        LabelBinarizer::from_classes(["italian", "mexican", "thai"]).unwrap()
    }

    fn ingredients() -> LabelBinarizer {
        LabelBinarizer::from_classes(VEGETABLES.iter().copied()).unwrap()
    }

    fn index() -> FallbackIndex {
        FallbackIndex::from_entries([
            ("italian", vec!["tomato", "onion"]),
            ("mexican", vec!["corn", "onion", "tomato"]),
        ])
    }

    fn predictor(output: Vec<u8>) -> (Predictor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = FixedModel {
            output,
            calls: Arc::clone(&calls),
        };
        let p = Predictor::new(Box::new(model), ingredients(), cuisines(), index()).unwrap();
        (p, calls)
    }

    fn sel(names: &[&str]) -> Selection {
        Selection::new(names).unwrap()
    }

    #[test]
    fn empty_selection_is_no_prediction() {
        let (p, calls) = predictor(vec![1, 0, 0]);
        assert_eq!(p.predict(&Selection::default()), Prediction::NoPrediction);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "model must not be consulted");
    }

    #[test]
    fn confident_model_wins_over_fallback() {
        // Fallback alone would say mexican for this selection.
        let (p, _) = predictor(vec![0, 0, 1]);
        let result = p.predict(&sel(&["tomato", "onion", "corn"]));
        assert_eq!(result, Prediction::from_model("thai"));
        assert_eq!(result.source(), Some(PredictionSource::Model));
    }

    #[test]
    fn first_decoded_label_is_returned() {
        let (p, _) = predictor(vec![0, 1, 1]);
        assert_eq!(p.predict(&sel(&["corn"])).label(), Some("mexican"));
    }

    #[test]
    fn abstention_uses_fallback() {
        let (p, _) = predictor(vec![0, 0, 0]);
        assert_eq!(
            p.predict(&sel(&["tomato", "onion", "corn"])),
            Prediction::from_fallback("mexican")
        );
        assert_eq!(
            p.predict(&sel(&["tomato", "onion"])),
            Prediction::from_fallback("italian")
        );
    }

    #[test]
    fn abstention_and_weak_overlap_is_no_prediction() {
        let (p, _) = predictor(vec![0, 0, 0]);
        assert_eq!(p.predict(&sel(&["tomato", "lettuce"])), Prediction::NoPrediction);
        assert_eq!(
            p.predict(&sel(&["tomato", "lettuce"])).to_string(),
            cuisinier_core::NO_PREDICTION
        );
    }

    #[test]
    fn duplicates_do_not_reach_the_threshold() {
        let (p, _) = predictor(vec![0, 0, 0]);
        assert_eq!(p.predict(&sel(&["tomato", "tomato"])), Prediction::NoPrediction);
    }

    #[test]
    fn empty_label_is_skipped() {
        let cuisines = LabelBinarizer::from_classes(["", "greek"]).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let model = FixedModel {
            output: vec![1, 0],
            calls,
        };
        let p = Predictor::new(Box::new(model), ingredients(), cuisines, index()).unwrap();
        assert_eq!(
            p.predict(&sel(&["tomato", "onion"])),
            Prediction::from_fallback("italian")
        );
    }

    #[test]
    fn output_width_mismatch_falls_back() {
        let (p, _) = predictor(vec![1, 0]);
        assert_eq!(
            p.predict(&sel(&["corn", "onion"])),
            Prediction::from_fallback("mexican")
        );
    }

    #[test]
    fn inference_error_falls_back() {
        let p = Predictor::new(Box::new(FailingModel), ingredients(), cuisines(), index()).unwrap();
        assert_eq!(
            p.predict(&sel(&["tomato", "onion"])),
            Prediction::from_fallback("italian")
        );
    }

    #[test]
    fn min_overlap_is_configurable() {
        let (p, _) = predictor(vec![0, 0, 0]);
        let p = p.with_min_overlap(1);
        assert_eq!(p.min_overlap(), 1);
        assert_eq!(p.predict(&sel(&["corn"])), Prediction::from_fallback("mexican"));
    }

    #[test]
    fn rejects_model_encoder_width_mismatch() {
        let model = crate::model::LinearModel::new(vec![vec![0.0; 3]], vec![0.0]).unwrap();
        let result = Predictor::new(Box::new(model), ingredients(), cuisines(), index());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_model_cuisine_encoder_width_mismatch() {
        // 19 features, 3 labels, every weight positive: fires every label.
        let width = VEGETABLES.len();
        let model =
            crate::model::LinearModel::new(vec![vec![1.0; width]; 3], vec![0.0; 3]).unwrap();
        let two_cuisines = LabelBinarizer::from_classes(["italian", "mexican"]).unwrap();

        let err = Predictor::new(Box::new(model), ingredients(), two_cuisines, index())
            .err()
            .unwrap();
        assert!(err.to_string().contains("3 labels"), "{err}");
    }

    #[test]
    fn accepts_matching_model_shapes() {
        let width = VEGETABLES.len();
        let model =
            crate::model::LinearModel::new(vec![vec![1.0; width]; 3], vec![0.0; 3]).unwrap();
        let p = Predictor::new(Box::new(model), ingredients(), cuisines(), index()).unwrap();
        assert_eq!(p.predict(&sel(&["tomato"])), Prediction::from_model("italian"));
    }

    #[test]
    fn predictor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predictor>();
    }
}
