//! Relevance filtering of retrieval results
//!
//! Scores are cosine distances: smaller means more similar. An entry is kept
//! when `distance <= threshold`, so raising the threshold only ever keeps more.

use crate::config::RetrievalConfig;
use crate::providers::VectorSearchResult;

/// Keeps results close enough to ground an answer
#[derive(Debug, Clone, Copy)]
pub struct RelevanceFilter {
    max_distance: f32,
}

impl RelevanceFilter {
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.max_distance)
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Apply the configured threshold
    pub fn filter(&self, results: Vec<VectorSearchResult>) -> Vec<VectorSearchResult> {
        filter_by_distance(results, self.max_distance)
    }
}

/// Keep entries with `distance <= threshold`, preserving order
///
/// NaN distances never pass.
pub fn filter_by_distance(
    results: Vec<VectorSearchResult>,
    threshold: f32,
) -> Vec<VectorSearchResult> {
    let before = results.len();
    let kept: Vec<_> = results
        .into_iter()
        .filter(|r| r.distance <= threshold)
        .collect();

    if kept.len() < before {
        tracing::debug!(
            "Relevance filter dropped {} of {} results (threshold {})",
            before - kept.len(),
            before,
            threshold
        );
    }

    kept
}
