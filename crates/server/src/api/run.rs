//! The document question-answering endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use docqa_core::DocumentSource;
use docqa_ingest::embedding::VectorIndex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::ApiError;
use crate::state::{AppState, DocSession, SessionOutcome};

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// Document URL or local path.
    pub documents: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub answers: Vec<String>,
    pub success: bool,
    /// Wall-clock seconds for the whole request.
    pub processing_time: f64,
    pub questions_processed: usize,
    pub timestamp: String,
}

/// POST /hackrx/run: fetch the document (or reuse the current session),
/// answer every question against it. A document that cannot be fetched or
/// processed fails the whole request; a question that exhausts the provider
/// chain only fails its own slot.
pub async fn run(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    let started = Instant::now();
    let source = DocumentSource::parse(&request.documents);

    let outcome = ensure_session(&state, &source).await?;
    info!(
        source = %source.identity(),
        outcome = ?outcome,
        questions = request.questions.len(),
        "processing run request"
    );

    let session = state.session.read().await;
    let session = session
        .as_ref()
        .ok_or_else(|| ApiError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, "session missing"))?;

    let results = state
        .answerer
        .answer_batch(
            &request.questions,
            &session.filename,
            &session.chunks,
            &session.index,
        )
        .await;

    let success = results.iter().all(|r| r.is_ok());
    let answers = results
        .into_iter()
        .enumerate()
        .map(|(i, result)| match result {
            Ok(answer) => answer.text,
            Err(e) => {
                warn!(question = i, "question failed: {e}");
                format!("Error processing this question: {e}")
            }
        })
        .collect::<Vec<_>>();

    Ok(Json(RunResponse {
        questions_processed: answers.len(),
        answers,
        success,
        processing_time: started.elapsed().as_secs_f64(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Make sure the in-memory session holds this document, rebuilding it from
/// the chunk cache (and re-embedding) only when the content changed.
async fn ensure_session(
    state: &AppState,
    source: &DocumentSource,
) -> Result<SessionOutcome, ApiError> {
    let doc = state.loader.fetch(source).await?;
    let fingerprint = docqa_ingest::ChunkCache::fingerprint(&doc.bytes);

    if state.session_matches(&source.identity(), &fingerprint).await {
        return Ok(SessionOutcome::SessionHit);
    }

    let (cached, outcome) = state.cache.get_or_build(&doc)?;

    let texts: Vec<&str> = cached.chunks.iter().map(|c| c.content.as_str()).collect();
    let index = VectorIndex::build(
        &texts,
        state.embedder.as_ref(),
        state.config.embedding.batch_size as usize,
    )
    .await?;

    info!(
        filename = %cached.filename,
        category = %cached.category,
        chunks = cached.chunks.len(),
        "document session ready"
    );

    let mut session = state.session.write().await;
    *session = Some(DocSession {
        identity: source.identity(),
        fingerprint,
        filename: cached.filename,
        category: cached.category,
        chunks: cached.chunks,
        index,
    });

    Ok(outcome.into())
}
