//! Recursive-boundary text chunking with exact overlap
//!
//! Every chunk is at most `chunk_size` characters and starts exactly
//! `chunk_overlap` characters before the previous chunk ended, so dropping the
//! first `chunk_overlap` characters of every chunk after the first rebuilds the
//! document verbatim. Only the cut *end* is chosen: the latest paragraph break
//! in the window wins, then a line break, then a sentence boundary, then
//! whitespace, and only then a hard cut at `chunk_size`.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Text chunker with configurable size and overlap (both in characters)
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

/// Character span of a chunk within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// Callers are expected to pass validated values (`0 < overlap < chunk_size`);
    /// out-of-range overlap is clamped so chunking always makes progress.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Create a chunker from the shared chunking config
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk a document; chunks inherit its source and page
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let text = doc.content.as_str();
        let offsets = char_byte_offsets(text);

        self.spans_with_offsets(text, &offsets)
            .into_iter()
            .enumerate()
            .map(|(i, span)| {
                let content = text[offsets[span.start]..offsets[span.end]].to_string();
                Chunk::new(doc, content, i as u32, span.start)
            })
            .collect()
    }

    /// Split raw text into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let offsets = char_byte_offsets(text);
        self.spans_with_offsets(text, &offsets)
            .into_iter()
            .map(|span| text[offsets[span.start]..offsets[span.end]].to_string())
            .collect()
    }

    /// Character spans of the chunks `text` would be split into
    pub fn spans(&self, text: &str) -> Vec<Span> {
        self.spans_with_offsets(text, &char_byte_offsets(text))
    }

    fn spans_with_offsets(&self, text: &str, offsets: &[usize]) -> Vec<Span> {
        let total = offsets.len() - 1;
        if total == 0 {
            return Vec::new();
        }

        let tiers = Boundaries::scan(text, offsets);
        let mut spans = Vec::new();
        let mut start = 0usize;

        loop {
            if total - start <= self.chunk_size {
                spans.push(Span { start, end: total });
                break;
            }

            // The cut must land past the overlap so the next start moves forward
            let lo = start + self.overlap;
            let hi = start + self.chunk_size;
            let end = tiers.best_cut(lo, hi).unwrap_or(hi);

            spans.push(Span { start, end });
            start = end - self.overlap;
        }

        spans
    }
}

/// Candidate cut positions (character indices), in preference order
struct Boundaries {
    tiers: [Vec<usize>; 4],
}

impl Boundaries {
    fn scan(text: &str, offsets: &[usize]) -> Self {
        let mut paragraphs = Vec::new();
        let mut lines = Vec::new();
        let mut words = Vec::new();

        let mut prev = None;
        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                lines.push(i + 1);
                if prev == Some('\n') {
                    paragraphs.push(i + 1);
                }
            }
            if c.is_whitespace() {
                words.push(i + 1);
            }
            prev = Some(c);
        }

        let sentences = text
            .split_sentence_bound_indices()
            .map(|(byte, _)| byte)
            .filter(|&byte| byte > 0)
            .filter_map(|byte| offsets.binary_search(&byte).ok())
            .collect();

        Self {
            tiers: [paragraphs, lines, sentences, words],
        }
    }

    /// Latest boundary `b` with `lo < b <= hi` from the most preferred tier that has one
    fn best_cut(&self, lo: usize, hi: usize) -> Option<usize> {
        self.tiers.iter().find_map(|tier| {
            let idx = tier.partition_point(|&b| b <= hi);
            match idx.checked_sub(1).map(|i| tier[i]) {
                Some(b) if b > lo => Some(b),
                _ => None,
            }
        })
    }
}

/// Byte offset of every char start, plus `text.len()` as a sentinel
fn char_byte_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;
    use proptest::prelude::*;

    fn rebuild(chunks: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(chunk);
            } else {
                out.extend(chunk.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = TextChunker::new(100, 10);
        assert!(chunker.split_text("").is_empty());
    }

    #[test]
    fn test_short_input_is_one_chunk() {
        let chunker = TextChunker::new(100, 10);
        assert_eq!(chunker.split_text("Short note."), vec!["Short note.".to_string()]);
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        let chunker = TextChunker::new(20, 5);
        let text = "The sky is blue. Water boils at 100C.";
        let chunks = chunker.split_text(text);

        assert_eq!(chunks[0], "The sky is blue. ");
        assert_eq!(rebuild(&chunks, 5), text);
    }

    #[test]
    fn test_prefers_paragraph_over_sentence() {
        let chunker = TextChunker::new(40, 4);
        let text = "First para. Still first.\n\nSecond para here. And more text follows.";
        let chunks = chunker.split_text(text);

        assert_eq!(chunks[0], "First para. Still first.\n\n");
        assert_eq!(rebuild(&chunks, 4), text);
    }

    #[test]
    fn test_falls_back_to_word_then_hard_cut() {
        let chunker = TextChunker::new(10, 2);
        let words = chunker.split_text("alpha beta gamma delta");
        assert_eq!(words[0], "alpha ");

        let hard = chunker.split_text("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(hard[0], "abcdefghij");
        assert_eq!(hard[1], "ijklmnopqr");
        assert_eq!(rebuild(&hard, 2), "abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let chunker = TextChunker::new(8, 3);
        let text = "Größe ändert sich überall — ja.";
        let chunks = chunker.split_text(text);

        assert!(chunks.iter().all(|c| c.chars().count() <= 8));
        assert_eq!(rebuild(&chunks, 3), text);
    }

    #[test]
    fn test_chunk_document_tracks_offsets_and_page() {
        let chunker = TextChunker::new(20, 5);
        let doc = Document::page(
            "The sky is blue. Water boils at 100C.",
            "docs/facts.pdf",
            1,
            FileType::Pdf,
        );
        let chunks = chunker.chunk_document(&doc);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].char_start, 0);
        assert_eq!(chunks[1].char_start, 12);
        assert!(chunks.iter().all(|c| c.source.page == Some(1)));
        assert_eq!(
            chunks.iter().map(|c| c.chunk_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    proptest! {
        #[test]
        fn prop_chunks_rebuild_bounded_and_overlapping(
            text in "[a-zA-Z .!?\n]{0,400}",
            size in 2usize..60,
            overlap_seed in 0usize..1000,
        ) {
            let overlap = 1 + overlap_seed % (size - 1);
            let chunker = TextChunker::new(size, overlap);
            let chunks = chunker.split_text(&text);

            prop_assert_eq!(chunks.is_empty(), text.is_empty());
            prop_assert!(chunks.iter().all(|c| c.chars().count() <= size));
            prop_assert_eq!(rebuild(&chunks, overlap), text.clone());

            for pair in chunks.windows(2) {
                let prev: Vec<char> = pair[0].chars().collect();
                let next: Vec<char> = pair[1].chars().collect();
                prop_assert_eq!(&prev[prev.len() - overlap..], &next[..overlap]);
            }
        }
    }
}
