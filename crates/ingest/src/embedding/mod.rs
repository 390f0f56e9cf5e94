pub mod cache;
pub mod index;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use docqa_core::Config;
use tracing::warn;

pub use cache::EmbeddingCache;
pub use index::VectorIndex;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Pick the embedding backend from config. Falls back to Ollama when
/// `EMBEDDING_PROVIDER=openai` but no OpenAI key is set.
pub fn embedder_from_config(config: &Config) -> Arc<dyn Embedder> {
    if config.embedding.provider == "openai" {
        if let Some(api_key) = &config.llm.openai_api_key {
            return Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                config.embedding.openai_model.clone(),
                config.llm.openai_base_url.clone(),
                config.embedding.dimensions as usize,
            ));
        }
        warn!("EMBEDDING_PROVIDER=openai but OPENAI_API_KEY is unset, using ollama");
    }
    Arc::new(OllamaEmbedder::new(
        config.ollama.url.clone(),
        config.ollama.embedding_model.clone(),
        config.embedding.dimensions as usize,
    ))
}
