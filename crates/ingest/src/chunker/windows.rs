//! Fixed-window text splitting with exact overlap.

use super::types::{Chunk, ChunkStrategy};

/// Split `text` into overlapping windows per `strategy`.
///
/// Every chunk is at most `chunk_size` chars; consecutive chunks share
/// exactly `overlap` chars (the final chunk may be shorter). Offsets are
/// char counts, and slicing always lands on char boundaries.
pub fn chunk_text(text: &str, strategy: &ChunkStrategy) -> Vec<Chunk> {
    debug_assert!(strategy.overlap < strategy.chunk_size);

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = bounds.len() - 1;

    if total_chars == 0 {
        return Vec::new();
    }

    let stride = strategy.stride();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let end = (start + strategy.chunk_size).min(total_chars);
        let index = chunks.len();
        chunks.push(Chunk {
            index,
            content: text[bounds[start]..bounds[end]].to_string(),
            char_start: start,
            char_end: end,
            overlap: if index == 0 { 0 } else { strategy.overlap },
        });
        if end == total_chars {
            break;
        }
        start += stride;
    }

    chunks
}
