//! HTTP router construction.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{api, auth};

/// Assemble the application router. Only the run endpoint requires the
/// bearer token; health and root stay open for probes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/hackrx/run", post(api::run))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use docqa_core::config::{
        Config, EmbeddingConfig, LlmConfig, OllamaConfig, RetrievalConfig, ServerConfig,
        StorageConfig,
    };
    use docqa_ingest::embedding::{Embedder, EmbeddingError};
    use docqa_ingest::{ChunkCache, Loader};
    use docqa_llm::provider::{LlmError, LlmProvider, Message, Role};
    use docqa_llm::Answerer;
    use http_body_util::BodyExt;
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    struct LetterEmbedder;

    #[async_trait]
    impl Embedder for LetterEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 26];
                    for c in t.to_lowercase().chars() {
                        if c.is_ascii_lowercase() {
                            v[(c as u8 - b'a') as usize] += 1.0;
                        }
                    }
                    v
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            26
        }
    }

    /// Answers with the user prompt so tests can assert the retrieved
    /// context made it into the request.
    #[derive(Debug)]
    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn complete(
            &self,
            messages: Vec<Message>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            Ok(messages
                .iter()
                .find(|m| matches!(m.role, Role::User))
                .map(|m| m.content.clone())
                .unwrap_or_default())
        }
    }

    fn test_config(cache_dir: &std::path::Path) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                api_key: "test-key".into(),
            },
            storage: StorageConfig {
                cache_dir: cache_dir.to_path_buf(),
                docs_dir: cache_dir.to_path_buf(),
            },
            llm: LlmConfig {
                openai_api_key: None,
                openai_model: "gpt-4o".into(),
                openai_base_url: None,
                gemini_api_key: None,
                gemini_model: "gemini-1.5-flash".into(),
                temperature: 0.1,
                max_tokens: 4096,
                request_timeout_secs: 5,
            },
            embedding: EmbeddingConfig {
                provider: "ollama".into(),
                openai_model: "text-embedding-3-small".into(),
                dimensions: 26,
                batch_size: 8,
                cache_capacity: 64,
            },
            ollama: OllamaConfig {
                url: "http://localhost:11434".into(),
                embedding_model: "nomic-embed-text".into(),
            },
            retrieval: RetrievalConfig { top_k: 5 },
        }
    }

    fn test_app(cache_dir: &std::path::Path) -> Router {
        let config = test_config(cache_dir);
        let embedder: Arc<dyn Embedder> = Arc::new(LetterEmbedder);
        let answerer = Answerer::new(
            vec![Box::new(EchoProvider)],
            embedder.clone(),
            config.retrieval.top_k,
            config.llm.temperature,
            config.llm.max_tokens,
            config.embedding.cache_capacity,
        );
        let state = Arc::new(AppState {
            loader: Loader::new(Duration::from_secs(5)),
            cache: ChunkCache::new(cache_dir).unwrap(),
            embedder,
            answerer,
            session: RwLock::new(None),
            config,
        });
        build_router(state)
    }

    fn run_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/hackrx/run")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn root_and_health_are_public() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn run_rejects_missing_and_wrong_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let body = serde_json::json!({"documents": "x.txt", "questions": ["q"]});

        let response = app.clone().oneshot(run_request(None, body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app.oneshot(run_request(Some("wrong"), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn run_answers_questions_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap();
        doc.write_all(b"The warranty period is 12 months.").unwrap();

        let app = test_app(dir.path());
        let body = serde_json::json!({
            "documents": doc.path().to_str().unwrap(),
            "questions": ["What is the warranty period?"],
        });

        let response = app.oneshot(run_request(Some("test-key"), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["questions_processed"], 1);
        assert!(parsed["answers"][0]
            .as_str()
            .unwrap()
            .contains("12 months"));
    }

    #[tokio::test]
    async fn run_fails_whole_request_for_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let body = serde_json::json!({
            "documents": "/no/such/file.txt",
            "questions": ["q"],
        });

        let response = app.oneshot(run_request(Some("test-key"), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["success"], false);
    }
}
