//! Question answering over retrieved chunks.
//!
//! For each question: embed it, pull the top-k most similar chunks from the
//! document's index, build a grounded prompt, and walk the provider chain
//! with a retry-then-failover policy. Questions in a batch are independent;
//! one question exhausting its providers never affects the others.

use std::sync::Arc;

use docqa_core::Config;
use docqa_ingest::chunker::Chunk;
use docqa_ingest::embedding::{Embedder, EmbeddingCache, EmbeddingError, VectorIndex};
use futures::future::join_all;
use thiserror::Error;
use tracing::warn;

use crate::provider::{LlmError, LlmProvider, Message, Role};
use crate::providers;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based on provided document content.";

const NO_CONTEXT_ANSWER: &str =
    "I couldn't find relevant information in the document to answer this question.";

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("failed to embed question: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("all providers exhausted: {last}")]
    Exhausted { last: LlmError },
}

/// Answer text plus the chunk indices used as evidence.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub evidence: Vec<usize>,
    /// Provider that produced the text, None for the no-context answer.
    pub provider: Option<&'static str>,
}

// ── Retry/failover state machine ────────────────────────────────────────────

/// Progress of one question through the provider chain. Each provider gets
/// one retry before the question fails over to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// First call against provider `i`.
    Attempting(usize),
    /// Second call against the same provider after one failure.
    Retrying(usize),
    /// First call against the next provider after the previous was retried.
    FailedOver(usize),
    Succeeded,
    Exhausted,
}

impl AttemptState {
    /// Provider to call in this state, if any.
    pub fn provider_index(&self) -> Option<usize> {
        match self {
            Self::Attempting(i) | Self::Retrying(i) | Self::FailedOver(i) => Some(*i),
            Self::Succeeded | Self::Exhausted => None,
        }
    }

    /// Transition after a failed provider call.
    pub fn on_failure(self, chain_len: usize) -> Self {
        match self {
            Self::Attempting(i) | Self::FailedOver(i) => Self::Retrying(i),
            Self::Retrying(i) => {
                if i + 1 < chain_len {
                    Self::FailedOver(i + 1)
                } else {
                    Self::Exhausted
                }
            }
            terminal => terminal,
        }
    }
}

// ── Answerer ────────────────────────────────────────────────────────────────

pub struct Answerer {
    chain: Vec<Box<dyn LlmProvider>>,
    embedder: Arc<dyn Embedder>,
    embed_cache: tokio::sync::Mutex<EmbeddingCache>,
    top_k: usize,
    temperature: f32,
    max_tokens: u32,
}

impl Answerer {
    pub fn new(
        chain: Vec<Box<dyn LlmProvider>>,
        embedder: Arc<dyn Embedder>,
        top_k: usize,
        temperature: f32,
        max_tokens: u32,
        embed_cache_capacity: usize,
    ) -> Self {
        Self {
            chain,
            embedder,
            embed_cache: tokio::sync::Mutex::new(EmbeddingCache::new(embed_cache_capacity)),
            top_k,
            temperature,
            max_tokens,
        }
    }

    /// Build from config. Fails with `LlmError::NotConfigured` when neither
    /// provider credential is set.
    pub fn from_config(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Self, LlmError> {
        let chain = providers::build_chain(&config.llm)?;
        Ok(Self::new(
            chain,
            embedder,
            config.retrieval.top_k,
            config.llm.temperature,
            config.llm.max_tokens,
            config.embedding.cache_capacity,
        ))
    }

    /// Answer one question against a single document's chunks.
    pub async fn answer(
        &self,
        question: &str,
        doc_name: &str,
        chunks: &[Chunk],
        index: &VectorIndex,
    ) -> Result<Answer, AnswerError> {
        let evidence = self.retrieve(question, index).await?;
        let context: Vec<(&str, &Chunk)> = evidence
            .iter()
            .filter_map(|&i| chunks.get(i).map(|c| (doc_name, c)))
            .collect();
        self.complete_from_context(question, evidence, context).await
    }

    /// Answer against a multi-document corpus, with one source label per
    /// chunk (parallel to `chunks`).
    pub async fn answer_labeled(
        &self,
        question: &str,
        chunks: &[Chunk],
        labels: &[String],
        index: &VectorIndex,
    ) -> Result<Answer, AnswerError> {
        let evidence = self.retrieve(question, index).await?;
        let context: Vec<(&str, &Chunk)> = evidence
            .iter()
            .filter_map(|&i| {
                let chunk = chunks.get(i)?;
                let label = labels.get(i).map(String::as_str).unwrap_or("document");
                Some((label, chunk))
            })
            .collect();
        self.complete_from_context(question, evidence, context).await
    }

    async fn retrieve(
        &self,
        question: &str,
        index: &VectorIndex,
    ) -> Result<Vec<usize>, AnswerError> {
        let embedding = self.embed_question(question).await?;
        Ok(index
            .search(&embedding, self.top_k)
            .into_iter()
            .map(|(i, _)| i)
            .collect())
    }

    async fn complete_from_context(
        &self,
        question: &str,
        evidence: Vec<usize>,
        context: Vec<(&str, &Chunk)>,
    ) -> Result<Answer, AnswerError> {
        if context.is_empty() {
            return Ok(Answer {
                text: NO_CONTEXT_ANSWER.to_string(),
                evidence: Vec::new(),
                provider: None,
            });
        }

        let messages = build_messages(question, &context);
        let (text, provider) = self.complete_with_fallback(messages).await?;
        Ok(Answer {
            text: text.trim().to_string(),
            evidence,
            provider: Some(provider),
        })
    }

    /// Answer a batch of questions concurrently. Each slot carries its own
    /// result so a failed question leaves the rest intact.
    pub async fn answer_batch(
        &self,
        questions: &[String],
        doc_name: &str,
        chunks: &[Chunk],
        index: &VectorIndex,
    ) -> Vec<Result<Answer, AnswerError>> {
        join_all(
            questions
                .iter()
                .map(|q| self.answer(q, doc_name, chunks, index)),
        )
        .await
    }

    async fn embed_question(&self, question: &str) -> Result<Vec<f32>, EmbeddingError> {
        {
            let mut cache = self.embed_cache.lock().await;
            if let Some(hit) = cache.get(question) {
                return Ok(hit);
            }
        }
        let mut vectors = self.embedder.embed_batch(&[question]).await?;
        let embedding = vectors
            .pop()
            .ok_or_else(|| EmbeddingError::Api("empty embedding response".into()))?;
        self.embed_cache
            .lock()
            .await
            .put(question, embedding.clone());
        Ok(embedding)
    }

    /// Drive the retry-then-failover state machine until a provider answers
    /// or the chain is exhausted.
    async fn complete_with_fallback(
        &self,
        messages: Vec<Message>,
    ) -> Result<(String, &'static str), AnswerError> {
        let mut state = AttemptState::Attempting(0);
        let mut last_err: Option<LlmError> = None;

        while let Some(i) = state.provider_index() {
            let provider = &self.chain[i];
            match provider
                .complete(messages.clone(), self.temperature, self.max_tokens)
                .await
            {
                Ok(text) => return Ok((text, provider.name())),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        state = ?state,
                        "provider call failed: {e}"
                    );
                    last_err = Some(e);
                    state = state.on_failure(self.chain.len());
                }
            }
        }

        Err(AnswerError::Exhausted {
            last: last_err.unwrap_or(LlmError::NotConfigured("empty provider chain".into())),
        })
    }
}

/// Prompt layout: context blocks separated by `---`, then the question with
/// grounding instructions.
fn build_messages(question: &str, context: &[(&str, &Chunk)]) -> Vec<Message> {
    let context_text = context
        .iter()
        .map(|(source, chunk)| format!("Source: {source}\nContent: {}", chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let user_prompt = format!(
        "Based on the following document content, please answer this question: \"{question}\"\n\n\
         **Document Content:**\n{context_text}\n\n\
         **Instructions:**\n\
         1. Answer the question based only on the provided document content\n\
         2. If the information is not available in the content, say so clearly\n\
         3. Be concise but thorough\n\
         4. Reference specific parts of the document when possible\n\n\
         Please provide a clear and helpful answer."
    );

    vec![
        Message {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        },
        Message {
            role: Role::User,
            content: user_prompt,
        },
    ]
}
