//! Plain-text rendering for prediction results and the fallback index.

use std::fmt::Write;

use cuisinier_ai::FallbackIndex;
use cuisinier_core::{Prediction, Selection};

// ── Public API ──

/// Result card: what was chosen and what it predicts.
pub fn render_prediction(selection: &Selection, prediction: &Prediction) -> String {
    let mut out = String::new();
    let chosen = if selection.is_empty() {
        "(nothing)".to_string()
    } else {
        selection.items().join(", ")
    };

    let _ = writeln!(out, "=== Cuisine prediction ===");
    let _ = writeln!(out, "  {:<12} {}", "chosen", chosen);
    let _ = writeln!(out, "  {:<12} {}", "prediction", prediction);
    if let Some(source) = prediction.source() {
        let _ = writeln!(out, "  {:<12} {}", "source", source.as_str());
    }
    out
}

/// One line per cuisine in index order, then a summary line.
pub fn render_index(index: &FallbackIndex) -> String {
    let mut out = String::new();
    for (cuisine, vegetables) in index.iter() {
        let list: Vec<&str> = vegetables.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(out, "  {:<16} {}", cuisine, list.join(", "));
    }

    let s = index.summary();
    let _ = writeln!(
        out,
        "{} cuisines, {} vegetable associations from {} recipes",
        s.cuisines, s.associations, s.recipes_scanned
    );
    out
}
