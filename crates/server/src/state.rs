use std::sync::Arc;

use docqa_core::{Config, DocumentCategory};
use docqa_ingest::chunker::Chunk;
use docqa_ingest::embedding::{Embedder, VectorIndex};
use docqa_ingest::{CacheOutcome, ChunkCache, Loader};
use docqa_llm::Answerer;
use tokio::sync::RwLock;

/// The last processed document, kept in memory so repeated requests for the
/// same URL skip extraction, chunking, and embedding entirely.
pub struct DocSession {
    pub identity: String,
    pub fingerprint: String,
    pub filename: String,
    pub category: DocumentCategory,
    pub chunks: Vec<Chunk>,
    pub index: VectorIndex,
}

pub struct AppState {
    pub config: Config,
    pub loader: Loader,
    pub cache: ChunkCache,
    pub embedder: Arc<dyn Embedder>,
    pub answerer: Answerer,
    pub session: RwLock<Option<DocSession>>,
}

impl AppState {
    /// Whether the in-memory session already covers this exact document
    /// content. Fingerprint comparison catches URLs whose content changed.
    pub async fn session_matches(&self, identity: &str, fingerprint: &str) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.identity == identity && s.fingerprint == fingerprint)
            .unwrap_or(false)
    }
}

/// What the run endpoint reports about how the document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Session reused, no cache or embedding work done.
    SessionHit,
    /// Chunks came from the disk cache, index rebuilt.
    CacheHit,
    /// Document extracted and chunked from scratch.
    Rebuilt,
}

impl From<CacheOutcome> for SessionOutcome {
    fn from(outcome: CacheOutcome) -> Self {
        match outcome {
            CacheOutcome::Hit => Self::CacheHit,
            CacheOutcome::Rebuilt => Self::Rebuilt,
        }
    }
}
