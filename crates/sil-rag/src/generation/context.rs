//! Rendering retrieved chunks into a citation-labelled context block

use crate::providers::VectorSearchResult;
use crate::types::Citation;

/// Context text plus the citations it refers to, in the same order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedContext {
    /// Labelled blocks separated by blank lines
    pub text: String,
    /// One citation per block
    pub citations: Vec<Citation>,
}

impl FormattedContext {
    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    /// Rendered citation labels, e.g. `[1] manual.pdf (p.3) (rel 0.12)`
    pub fn labels(&self) -> Vec<String> {
        self.citations.iter().map(ToString::to_string).collect()
    }
}

/// Renders filtered results for the grounded prompt
#[derive(Debug, Clone, Copy)]
pub struct ContextFormatter {
    max_chars: usize,
}

impl ContextFormatter {
    /// `max_chars` caps the content shown per chunk
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn format(&self, results: &[VectorSearchResult]) -> FormattedContext {
        format_context(results, self.max_chars)
    }
}

/// Build one `--- label ---` block per result, in result order
pub fn format_context(results: &[VectorSearchResult], max_chars: usize) -> FormattedContext {
    let mut blocks = Vec::with_capacity(results.len());
    let mut citations = Vec::with_capacity(results.len());

    for (i, result) in results.iter().enumerate() {
        let citation = Citation {
            index: i + 1,
            source_name: result.chunk.source.file_name().to_string(),
            page: result.chunk.source.page,
            distance: result.distance,
        };

        blocks.push(format!(
            "--- {} ---\n{}",
            citation,
            truncate_chars(&result.chunk.content, max_chars)
        ));
        citations.push(citation);
    }

    FormattedContext {
        text: blocks.join("\n\n"),
        citations,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, Document, FileType};

    fn result(content: &str, source: &str, page: Option<u32>, distance: f32) -> VectorSearchResult {
        let doc = match page {
            Some(p) => Document::page(content, source, p, FileType::Pdf),
            None => Document::new(content, source, FileType::Txt),
        };
        VectorSearchResult {
            chunk: Chunk::new(&doc, content.to_string(), 0, 0),
            distance,
        }
    }

    #[test]
    fn test_empty_input() {
        let formatted = format_context(&[], 100);
        assert_eq!(formatted.text, "");
        assert!(formatted.citations.is_empty());
        assert!(formatted.is_empty());
    }

    #[test]
    fn test_labels_and_blocks() {
        let results = vec![
            result("Reset the device.", "/srv/docs/manual.pdf", Some(2), 0.1234),
            result("Water boils at 100C.", "docs/facts.txt", None, 0.3),
        ];
        let formatted = format_context(&results, 1500);

        assert_eq!(
            formatted.labels(),
            vec![
                "[1] manual.pdf (p.3) (rel 0.12)".to_string(),
                "[2] facts.txt (rel 0.30)".to_string(),
            ]
        );
        assert_eq!(
            formatted.text,
            "--- [1] manual.pdf (p.3) (rel 0.12) ---\nReset the device.\n\n\
             --- [2] facts.txt (rel 0.30) ---\nWater boils at 100C."
        );
    }

    #[test]
    fn test_content_is_truncated_by_chars() {
        let results = vec![result("ééééé", "a.txt", None, 0.0)];
        let formatted = ContextFormatter::new(3).format(&results);
        assert!(formatted.text.ends_with("\nééé"));
    }
}
