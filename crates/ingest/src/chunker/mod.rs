//! Overlapping-window chunking engine.
//!
//! Splits extracted text into fixed character windows whose size and overlap
//! come from a per-category strategy table. Chunking is deterministic for
//! identical (text, category) input so cached chunk sequences can be
//! verified against a rebuild.

mod category;
mod types;
mod windows;

pub use category::infer_category;
pub use types::{Chunk, ChunkStrategy};
pub use windows::chunk_text;

#[cfg(test)]
mod tests;
