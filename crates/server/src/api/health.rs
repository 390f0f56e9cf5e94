//! Readiness and service-info endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use docqa_ingest::cache::CacheStats;
use docqa_llm::ProviderStatus;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub providers: ProviderStatus,
    pub cached_documents: CacheStats,
    /// Identity of the currently loaded document, if any.
    pub active_document: Option<String>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active_document = state
        .session
        .read()
        .await
        .as_ref()
        .map(|s| s.identity.clone());

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        providers: ProviderStatus::from_config(&state.config.llm),
        cached_documents: state.cache.stats(),
        active_document,
    })
}

#[derive(Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
    pub config: serde_json::Value,
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        service: "docqa",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec!["POST /hackrx/run", "GET /health", "GET /"],
        config: state.config.redacted_summary(),
    })
}
