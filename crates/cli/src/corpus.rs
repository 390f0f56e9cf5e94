//! Folder-wide document corpus: every supported file under the docs
//! directory, chunked through the cache and indexed together.

use std::path::{Path, PathBuf};

use anyhow::Result;
use docqa_core::{DocumentSource, SUPPORTED_EXTENSIONS};
use docqa_ingest::chunker::Chunk;
use docqa_ingest::embedding::{Embedder, VectorIndex};
use docqa_ingest::{CacheOutcome, ChunkCache, Loader};
use tracing::warn;
use walkdir::WalkDir;

pub struct Corpus {
    pub documents: usize,
    pub chunks: Vec<Chunk>,
    /// Source filename per chunk, parallel to `chunks`.
    pub labels: Vec<String>,
    pub index: VectorIndex,
    pub cache_hits: usize,
}

/// All supported files under `dir`, sorted for stable indexing order.
pub fn discover_documents(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|x| x.to_str())
                .map(|x| SUPPORTED_EXTENSIONS.contains(&x.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Chunk every document under `dir` (through the cache) and embed the whole
/// corpus into one index. Unreadable files are skipped with a warning so one
/// bad document never blocks the rest.
pub async fn build(
    dir: &Path,
    loader: &Loader,
    cache: &ChunkCache,
    embedder: &dyn Embedder,
    batch_size: usize,
    force: bool,
) -> Result<Corpus> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut documents = 0usize;
    let mut cache_hits = 0usize;

    for path in discover_documents(dir) {
        let source = DocumentSource::Path(path.clone());
        let doc = match loader.fetch(&source).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                continue;
            }
        };

        let cached = if force {
            cache.force_reprocess(&doc).map(|c| (c, CacheOutcome::Rebuilt))
        } else {
            cache.get_or_build(&doc)
        };
        let (cached, outcome) = match cached {
            Ok(pair) => pair,
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                continue;
            }
        };

        if outcome == CacheOutcome::Hit {
            cache_hits += 1;
        }
        documents += 1;
        labels.extend(std::iter::repeat(cached.filename.clone()).take(cached.chunks.len()));
        chunks.extend(cached.chunks);
    }

    let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
    let index = VectorIndex::build(&texts, embedder, batch_size).await?;

    Ok(Corpus {
        documents,
        chunks,
        labels,
        index,
        cache_hits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "two").unwrap();
        fs::write(dir.path().join("a.md"), "one").unwrap();
        fs::write(dir.path().join("ignore.bin"), [0u8; 4]).unwrap();

        let found = discover_documents(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("a.md"));
        assert!(found[1].ends_with("b.txt"));
    }
}
