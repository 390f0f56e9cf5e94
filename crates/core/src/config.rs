use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub ollama: OllamaConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_env(),
            llm: LlmConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            ollama: OllamaConfig::from_env(),
            retrieval: RetrievalConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:     {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  storage:    cache_dir={}, docs_dir={}",
            self.storage.cache_dir.display(),
            self.storage.docs_dir.display()
        );
        tracing::info!(
            "  llm:        openai={}, gemini={}",
            if self.llm.openai_api_key.is_some() { "configured" } else { "-" },
            if self.llm.gemini_api_key.is_some() { "configured" } else { "-" },
        );
        tracing::info!(
            "  embedding:  provider={}, dims={}",
            self.embedding.provider,
            self.embedding.dimensions
        );
        tracing::info!("  retrieval:  top_k={}", self.retrieval.top_k);
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "server": { "host": self.server.host, "port": self.server.port },
            "storage": {
                "cache_dir": self.storage.cache_dir,
                "docs_dir": self.storage.docs_dir,
            },
            "llm": {
                "openai_configured": self.llm.openai_api_key.is_some(),
                "gemini_configured": self.llm.gemini_api_key.is_some(),
            },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
            },
            "retrieval": { "top_k": self.retrieval.top_k },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer key callers must present on the processing endpoint.
    pub api_key: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 8000),
            api_key: env_or("API_KEY", "your-secure-api-key"),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where chunk cache entries are persisted.
    pub cache_dir: PathBuf,
    /// Directory the interactive CLI scans for documents.
    pub docs_dir: PathBuf,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            cache_dir: PathBuf::from(env_or("CACHE_DIR", "cache/chunks")),
            docs_dir: PathBuf::from(env_or("DOCS_DIR", "data/docs")),
        }
    }
}

// ── LLM (OpenAI / Gemini) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-call timeout for outbound provider requests, seconds.
    pub request_timeout_secs: u64,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            temperature: env_or("LLM_TEMPERATURE", "0.1").parse().unwrap_or(0.1),
            max_tokens: env_u32("LLM_MAX_TOKENS", 4096),
            request_timeout_secs: env_or("LLM_REQUEST_TIMEOUT_SECS", "60")
                .parse()
                .unwrap_or(60),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Model used when `provider` is "openai".
    pub openai_model: String,
    pub dimensions: u32,
    pub batch_size: u32,
    pub cache_capacity: usize,
}

impl EmbeddingConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("EMBEDDING_PROVIDER", "ollama"),
            openai_model: env_or("EMBEDDING_OPENAI_MODEL", "text-embedding-3-small"),
            dimensions: env_u32("EMBEDDING_DIMENSIONS", 768),
            batch_size: env_u32("EMBEDDING_BATCH_SIZE", 64),
            cache_capacity: env_usize("EMBEDDING_CACHE_CAPACITY", 4096),
        }
    }
}

// ── Ollama (local embedding models) ───────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env() -> Self {
        Self {
            url: env_or("OLLAMA_URL", "http://localhost:11434"),
            embedding_model: env_or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// How many chunks are handed to the LLM per question.
    pub top_k: usize,
}

impl RetrievalConfig {
    fn from_env() -> Self {
        Self {
            top_k: env_usize("RETRIEVAL_TOP_K", 5),
        }
    }
}
