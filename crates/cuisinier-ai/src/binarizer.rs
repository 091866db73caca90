//! Multi-label binarization.
//!
//! A [`LabelBinarizer`] maps a set of labels to a fixed-width 0/1 vector,
//! one column per known class, and back. The same type serves as the
//! ingredient encoder (selection -> model input) and the cuisine encoder
//! (model output -> cuisine labels).

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncoderError {
    #[error("vector has width {got}, encoder expects {expected}")]
    WidthMismatch { expected: usize, got: usize },
}

/// On-disk form: the fitted classes in column order.
#[derive(Serialize, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// Bidirectional mapping between label sets and presence vectors.
#[derive(Debug, Clone)]
pub struct LabelBinarizer {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelBinarizer {
    /// Build from classes in column order. Duplicate classes are rejected.
    pub fn from_classes<I, S>(classes: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(classes.len());
        for (i, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), i).is_some() {
                anyhow::bail!("duplicate class {class:?}");
            }
        }
        Ok(Self { classes, index })
    }

    /// Load an encoder file (`{"classes": [...]}`).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "encoder not found: {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading encoder {}", path.display()))?;
        let file: EncoderFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing encoder {}", path.display()))?;
        let encoder = Self::from_classes(file.classes)
            .with_context(|| format!("invalid encoder {}", path.display()))?;
        info!(classes = encoder.width(), path = %path.display(), "loaded encoder");
        Ok(encoder)
    }

    /// Write this encoder in the format [`LabelBinarizer::load`] reads.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = EncoderFile {
            classes: self.classes.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Encode a label set as a presence vector.
    ///
    /// Labels the encoder was not fitted on are ignored. Duplicates set the
    /// same column once.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Vec<u8> {
        let mut row = vec![0u8; self.width()];
        for label in labels {
            let label = label.as_ref();
            match self.index.get(label) {
                Some(&col) => row[col] = 1,
                None => warn!(label, "unknown label ignored by encoder"),
            }
        }
        row
    }

    /// Decode a presence vector into labels, in column order.
    ///
    /// Any non-zero entry counts as present.
    pub fn inverse_transform(&self, row: &[u8]) -> Result<Vec<String>, EncoderError> {
        if row.len() != self.width() {
            return Err(EncoderError::WidthMismatch {
                expected: self.width(),
                got: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(&self.classes)
            .filter(|(bit, _)| **bit != 0)
            .map(|(_, class)| class.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuisinier_core::VEGETABLES;
    use std::collections::BTreeSet;

    fn vegetables() -> LabelBinarizer {
        LabelBinarizer::from_classes(VEGETABLES.iter().copied()).unwrap()
    }

    #[test]
    fn transform_sets_columns_in_class_order() {
        let enc = LabelBinarizer::from_classes(["carrot", "onion", "tomato"]).unwrap();
        assert_eq!(enc.transform(&["tomato", "carrot"]), vec![1, 0, 1]);
        assert_eq!(enc.transform::<&str>(&[]), vec![0, 0, 0]);
    }

    #[test]
    fn duplicates_set_a_single_column() {
        let enc = vegetables();
        assert_eq!(enc.transform(&["carrot", "carrot"]), enc.transform(&["carrot"]));
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let enc = LabelBinarizer::from_classes(["carrot", "onion"]).unwrap();
        assert_eq!(enc.transform(&["garlic", "onion"]), vec![0, 1]);
    }

    #[test]
    fn round_trip_recovers_the_set() {
        let enc = vegetables();
        let chosen = ["potato", "green beans", "lettuce", "potato"];
        let decoded = enc.inverse_transform(&enc.transform(&chosen)).unwrap();

        let expected: BTreeSet<&str> = chosen.iter().copied().collect();
        let got: BTreeSet<&str> = decoded.iter().map(|s| s.as_str()).collect();
        assert_eq!(got, expected);
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn inverse_transform_rejects_wrong_width() {
        let enc = LabelBinarizer::from_classes(["italian", "mexican"]).unwrap();
        assert_eq!(
            enc.inverse_transform(&[1, 0, 0]),
            Err(EncoderError::WidthMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn inverse_transform_of_zero_row_is_empty() {
        let enc = LabelBinarizer::from_classes(["italian", "mexican"]).unwrap();
        assert!(enc.inverse_transform(&[0, 0]).unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicate_classes() {
        assert!(LabelBinarizer::from_classes(["a", "b", "a"]).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mlb_cuisine.json");
        let enc = LabelBinarizer::from_classes(["greek", "italian", "mexican"]).unwrap();
        enc.save(&path).unwrap();

        let loaded = LabelBinarizer::load(&path).unwrap();
        assert_eq!(loaded.classes(), enc.classes());
        assert!(loaded.contains("italian"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LabelBinarizer::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("encoder not found"));
    }

    #[test]
    fn load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"labels": []}"#).unwrap();
        assert!(LabelBinarizer::load(&path).is_err());
    }
}
