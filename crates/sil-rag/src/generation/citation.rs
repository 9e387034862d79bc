//! Inline citation markers in generated answers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Citation;

static CITATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("Invalid regex"));

/// Distinct `[n]` indices in `answer` that refer to one of `citations`, in first-use order
///
/// Markers pointing past the citation list (hallucinated indices) are dropped.
pub fn cited_indices(answer: &str, citations: &[Citation]) -> Vec<usize> {
    let mut cited = Vec::new();

    for cap in CITATION_MARKER.captures_iter(answer) {
        let Some(index) = cap.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) else {
            continue;
        };
        if citations.iter().any(|c| c.index == index) && !cited.contains(&index) {
            cited.push(index);
        }
    }

    cited
}
