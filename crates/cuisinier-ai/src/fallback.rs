//! Overlap fallback used when the classifier abstains.
//!
//! The index maps each cuisine to the vegetables that appear (as substrings
//! of ingredient strings) in its training recipes. A selection is scored
//! against every cuisine by set intersection size; the best cuisine at or
//! above a minimum overlap wins.
//!
//! Cuisines are kept in the order they were first associated with a
//! vegetable during the corpus scan. Ties go to the earlier cuisine, so
//! results are reproducible for a fixed corpus.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::Context;
use cuisinier_core::{Recipe, Selection};
use tracing::{debug, info};

/// Minimum number of shared vegetables for a fallback match.
pub const DEFAULT_MIN_OVERLAP: usize = 2;

/// Insertion-ordered cuisine -> vegetable set mapping.
#[derive(Debug, Clone, Default)]
pub struct FallbackIndex {
    entries: Vec<(String, BTreeSet<String>)>,
    positions: HashMap<String, usize>,
    recipes_scanned: usize,
}

/// Summary of a built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    pub recipes_scanned: usize,
    pub cuisines: usize,
    pub associations: usize,
}

impl FallbackIndex {
    /// Build from corpus recipes against a vegetable vocabulary.
    ///
    /// A vegetable is associated with a cuisine when any ingredient of any
    /// recipe of that cuisine contains it, case-insensitively. Vocabulary
    /// names are expected lowercase.
    pub fn build<'a, I>(recipes: I, vegetables: &[&str]) -> Self
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        let mut index = Self::default();

        for recipe in recipes {
            index.recipes_scanned += 1;
            for ingredient in &recipe.ingredients {
                let ingredient = ingredient.to_lowercase();
                for &veg in vegetables {
                    if ingredient.contains(veg) {
                        index.associate(&recipe.cuisine, veg);
                    }
                }
            }
        }

        let s = index.summary();
        info!(
            recipes = s.recipes_scanned,
            cuisines = s.cuisines,
            associations = s.associations,
            "built fallback index"
        );
        index
    }

    /// Read a JSON corpus file and build the index from it.
    pub fn from_corpus_file(path: &Path, vegetables: &[&str]) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "corpus not found: {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading corpus {}", path.display()))?;
        let recipes: Vec<Recipe> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing corpus {}", path.display()))?;
        Ok(Self::build(&recipes, vegetables))
    }

    /// Build directly from `(cuisine, vegetables)` pairs, in order.
    pub fn from_entries<I, C, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for (cuisine, vegetables) in entries {
            for veg in vegetables {
                index.associate(cuisine.as_ref(), veg.as_ref());
            }
        }
        index
    }

    fn associate(&mut self, cuisine: &str, vegetable: &str) {
        let pos = match self.positions.get(cuisine) {
            Some(&pos) => pos,
            None => {
                self.entries.push((cuisine.to_string(), BTreeSet::new()));
                let pos = self.entries.len() - 1;
                self.positions.insert(cuisine.to_string(), pos);
                pos
            }
        };
        self.entries[pos].1.insert(vegetable.to_string());
    }

    /// Cuisines with their vegetables, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn vegetables_for(&self, cuisine: &str) -> Option<&BTreeSet<String>> {
        self.positions.get(cuisine).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            recipes_scanned: self.recipes_scanned,
            cuisines: self.entries.len(),
            associations: self.entries.iter().map(|(_, v)| v.len()).sum(),
        }
    }

    /// Overlap score of `selection` against every cuisine, in index order.
    pub fn scores(&self, selection: &Selection) -> Vec<(&str, usize)> {
        let chosen = selection.distinct();
        self.entries
            .iter()
            .map(|(cuisine, vegetables)| {
                let score = chosen
                    .iter()
                    .filter(|v| vegetables.contains(**v))
                    .count();
                (cuisine.as_str(), score)
            })
            .collect()
    }

    /// Best cuisine with at least `min_overlap` shared vegetables.
    ///
    /// Only a strictly greater score replaces the current best, so the first
    /// cuisine in index order wins a tie.
    pub fn best_match(&self, selection: &Selection, min_overlap: usize) -> Option<&str> {
        let mut best: Option<&str> = None;
        let mut best_score = 0usize;

        for (cuisine, score) in self.scores(selection) {
            if score >= min_overlap && score > best_score {
                best = Some(cuisine);
                best_score = score;
            }
        }

        debug!(?best, best_score, min_overlap, "fallback scored");
        best
    }
}
