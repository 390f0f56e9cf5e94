pub mod cache;
pub mod chunker;
pub mod document;
pub mod embedding;
pub mod loader;

pub use cache::{CacheOutcome, CachedDocument, ChunkCache};
pub use chunker::{Chunk, ChunkStrategy};
pub use loader::{FetchError, LoadedDocument, Loader};
