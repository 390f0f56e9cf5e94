//! Chunk output and per-category strategy table.

use docqa_core::DocumentCategory;
use serde::{Deserialize, Serialize};

// ── Strategy table ──────────────────────────────────────────────────────────

/// Window parameters for one document category. Both counts are in
/// characters. Invariant: `overlap < chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStrategy {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl ChunkStrategy {
    /// Fixed lookup: the strategy tuned for a document category.
    pub fn for_category(category: DocumentCategory) -> Self {
        match category {
            DocumentCategory::Legal => Self { chunk_size: 800, overlap: 150 },
            DocumentCategory::Medical => Self { chunk_size: 600, overlap: 100 },
            DocumentCategory::Technical => Self { chunk_size: 1200, overlap: 250 },
            DocumentCategory::Financial => Self { chunk_size: 900, overlap: 180 },
            DocumentCategory::Default => Self { chunk_size: 1000, overlap: 200 },
        }
    }

    /// Window start distance between consecutive chunks.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// A bounded, possibly overlapping substring of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based index within the document.
    pub index: usize,
    /// The chunk text content.
    pub content: String,
    /// Character offset (not bytes) of the first char in the source text.
    pub char_start: usize,
    /// Character offset one past the last char.
    pub char_end: usize,
    /// Chars shared with the previous chunk (0 for the first).
    pub overlap: usize,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}
