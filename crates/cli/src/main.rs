mod cli;
mod corpus;
mod terminal;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use docqa_core::Config;
use docqa_ingest::{embedding, ChunkCache, Loader};
use docqa_llm::{Answerer, ProviderStatus};

use crate::cli::CliArgs;
use crate::corpus::Corpus;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let terminal = Terminal::new();

    docqa_core::config::load_dotenv();
    let mut config = Config::from_env();
    if let Some(docs) = args.docs {
        config.storage.docs_dir = docs;
    }
    if let Some(cache_dir) = args.cache_dir {
        config.storage.cache_dir = cache_dir;
    }
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }

    let embedder = embedding::embedder_from_config(&config);
    // Missing credentials leave the REPL usable for cache inspection;
    // queries report the problem instead.
    let answerer = match Answerer::from_config(&config, embedder.clone()) {
        Ok(a) => Some(a),
        Err(e) => {
            warn!("answering disabled: {e}");
            None
        }
    };

    let cache = ChunkCache::new(&config.storage.cache_dir)
        .with_context(|| format!("cannot create cache dir {}", config.storage.cache_dir.display()))?;
    let loader = Loader::new(Duration::from_secs(config.llm.request_timeout_secs));

    let docs_dir = config.storage.docs_dir.clone();
    terminal.print_dim(&format!("Indexing documents under {}...", docs_dir.display()))?;
    let mut corpus = corpus::build(
        &docs_dir,
        &loader,
        &cache,
        embedder.as_ref(),
        config.embedding.batch_size as usize,
        false,
    )
    .await?;

    let status = ProviderStatus::from_config(&config.llm);
    terminal.print_banner(
        corpus.documents,
        corpus.chunks.len(),
        status.active.unwrap_or("none"),
    )?;

    loop {
        let input = match terminal.read_input()? {
            Some(text) => text,
            None => {
                terminal.print_info("Goodbye.")?;
                break;
            }
        };

        match input.as_str() {
            "" => continue,
            "help" => print_help(&terminal)?,
            "stats" => print_stats(&terminal, &corpus, &cache)?,
            "cache" => print_cache(&terminal, &cache)?,
            "api" => print_api(&terminal, &status, answerer.is_some())?,
            "reprocess" => {
                terminal.print_dim("Reprocessing all documents...")?;
                corpus = corpus::build(
                    &docs_dir,
                    &loader,
                    &cache,
                    embedder.as_ref(),
                    config.embedding.batch_size as usize,
                    true,
                )
                .await?;
                terminal.print_info(&format!(
                    "Reprocessed {} documents ({} chunks).",
                    corpus.documents,
                    corpus.chunks.len()
                ))?;
            }
            question => ask(&terminal, &answerer, &corpus, question).await?,
        }
    }

    Ok(())
}

async fn ask(
    terminal: &Terminal,
    answerer: &Option<Answerer>,
    corpus: &Corpus,
    question: &str,
) -> Result<()> {
    let Some(answerer) = answerer else {
        terminal.print_error("no LLM credentials: set OPENAI_API_KEY or GEMINI_API_KEY")?;
        return Ok(());
    };

    match answerer
        .answer_labeled(question, &corpus.chunks, &corpus.labels, &corpus.index)
        .await
    {
        Ok(answer) => {
            terminal.print_answer(&answer.text)?;
            let mut sources: Vec<&str> = answer
                .evidence
                .iter()
                .filter_map(|&i| corpus.labels.get(i).map(String::as_str))
                .collect();
            sources.sort_unstable();
            sources.dedup();
            if !sources.is_empty() {
                terminal.print_dim(&format!("[sources: {}]", sources.join(", ")))?;
            }
        }
        Err(e) => terminal.print_error(&format!("{e}"))?,
    }
    Ok(())
}

fn print_help(terminal: &Terminal) -> Result<()> {
    terminal.print_info("Commands:")?;
    terminal.print_info("  stats       corpus and cache summary")?;
    terminal.print_info("  cache       list cached document entries")?;
    terminal.print_info("  reprocess   rebuild chunks and embeddings for all documents")?;
    terminal.print_info("  api         LLM provider availability")?;
    terminal.print_info("  help        this message")?;
    terminal.print_info("  exit        quit")?;
    terminal.print_info("Anything else is answered as a question against the corpus.")?;
    Ok(())
}

fn print_stats(terminal: &Terminal, corpus: &Corpus, cache: &ChunkCache) -> Result<()> {
    let stats = cache.stats();
    terminal.print_info(&format!(
        "Corpus: {} documents, {} chunks indexed ({} served from cache)",
        corpus.documents,
        corpus.chunks.len(),
        corpus.cache_hits
    ))?;
    terminal.print_info(&format!(
        "Cache: {} entries, {} chunks, {} bytes on disk",
        stats.entries, stats.chunks, stats.total_bytes
    ))?;
    Ok(())
}

fn print_cache(terminal: &Terminal, cache: &ChunkCache) -> Result<()> {
    let entries = cache.entries();
    if entries.is_empty() {
        terminal.print_info("Cache is empty.")?;
        return Ok(());
    }
    for entry in entries {
        terminal.print_info(&format!(
            "  {}  [{}]  {} chunks  {}  {}",
            entry.filename,
            entry.category,
            entry.chunk_count,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.fingerprint,
        ))?;
    }
    Ok(())
}

fn print_api(terminal: &Terminal, status: &ProviderStatus, usable: bool) -> Result<()> {
    terminal.print_info(&format!(
        "Answering: {}",
        if usable { "available" } else { "disabled (no credentials)" }
    ))?;
    terminal.print_info(&format!(
        "  openai: {}{}",
        if status.openai_available { "configured" } else { "not configured" },
        status
            .openai_model
            .as_deref()
            .map(|m| format!(" ({m})"))
            .unwrap_or_default(),
    ))?;
    terminal.print_info(&format!(
        "  gemini: {}{}",
        if status.gemini_available { "configured" } else { "not configured" },
        status
            .gemini_model
            .as_deref()
            .map(|m| format!(" ({m})"))
            .unwrap_or_default(),
    ))?;
    if let Some(active) = status.active {
        terminal.print_info(&format!("  primary: {active}"))?;
    }
    Ok(())
}
