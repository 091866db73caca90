//! User selections of vegetables.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::vocab;

/// Maximum number of vegetables a single request may carry.
pub const MAX_SELECTION: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown vegetable: {0:?}")]
    UnknownVegetable(String),
}

/// A validated selection of at most [`MAX_SELECTION`] vegetables.
///
/// Entries keep the order the user gave them. Duplicates are kept in the
/// sequence but only membership is meaningful: see [`Selection::distinct`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    items: Vec<String>,
}

impl Selection {
    /// Build a selection from raw names.
    ///
    /// Inputs beyond the first [`MAX_SELECTION`] are dropped before anything
    /// else happens. The remaining names are trimmed, lowercased and must all
    /// belong to the vocabulary.
    pub fn new<I, S>(names: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items = Vec::with_capacity(MAX_SELECTION);
        let mut dropped = 0usize;

        for (i, name) in names.into_iter().enumerate() {
            if i >= MAX_SELECTION {
                dropped += 1;
                continue;
            }
            let name = name.as_ref().trim().to_lowercase();
            if !vocab::is_vegetable(&name) {
                return Err(SelectionError::UnknownVegetable(name));
            }
            items.push(name);
        }

        if dropped > 0 {
            warn!(dropped, max = MAX_SELECTION, "selection truncated");
        }

        Ok(Self { items })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Entries in the order given, duplicates included.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Distinct entries (set semantics).
    pub fn distinct(&self) -> BTreeSet<&str> {
        self.items.iter().map(|s| s.as_str()).collect()
    }
}
