mod api;
mod auth;
mod router;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use docqa_core::Config;
use docqa_ingest::{embedding, ChunkCache, Loader};
use docqa_llm::Answerer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    docqa_core::config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let embedder = embedding::embedder_from_config(&config);
    // The server is useless without an answering backend, so missing
    // credentials are fatal here (the CLI degrades instead).
    let answerer = Answerer::from_config(&config, embedder.clone())
        .context("set OPENAI_API_KEY or GEMINI_API_KEY to start the server")?;

    let cache = ChunkCache::new(&config.storage.cache_dir)
        .with_context(|| format!("cannot create cache dir {}", config.storage.cache_dir.display()))?;
    let loader = Loader::new(Duration::from_secs(config.llm.request_timeout_secs));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(state::AppState {
        loader,
        cache,
        embedder,
        answerer,
        session: RwLock::new(None),
        config,
    });

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
