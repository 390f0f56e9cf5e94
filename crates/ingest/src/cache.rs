//! Persistent chunk cache with content-hash change detection.
//!
//! One JSON entry per document, keyed by document identity. An entry is
//! reused only while its stored fingerprint matches the current bytes;
//! anything else (changed content, unreadable file, bad JSON) degrades to a
//! rebuild, never to a hard error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use docqa_core::{DocumentCategory, DocumentSource};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::chunker::{self, Chunk, ChunkStrategy};
use crate::document::{self, ExtractionError};
use crate::loader::LoadedDocument;

/// Whether `get_or_build` served a stored entry or ran the chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Rebuilt,
}

/// A persisted chunk sequence for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub fingerprint: String,
    /// Document identity (path or URL) the entry belongs to.
    pub source: String,
    pub filename: String,
    pub category: DocumentCategory,
    pub created_at: DateTime<Utc>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub chunks: usize,
    pub total_bytes: u64,
}

/// Per-entry view for cache introspection.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntrySummary {
    pub filename: String,
    pub category: DocumentCategory,
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
    pub fingerprint: String,
}

pub struct ChunkCache {
    dir: PathBuf,
    /// Serializes the fingerprint-check-then-write sequence per document
    /// identity so concurrent callers cannot race a rebuild.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChunkCache {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// SHA-256 hex digest of the raw document bytes.
    pub fn fingerprint(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex_encode(&hasher.finalize())
    }

    /// Return the cached chunk sequence for `doc`, rebuilding it when the
    /// entry is missing, stale, or unreadable.
    pub fn get_or_build(
        &self,
        doc: &LoadedDocument,
    ) -> Result<(CachedDocument, CacheOutcome), ExtractionError> {
        let identity = doc.source.identity();
        let guard = self.lock_for(&identity);
        let _held = guard.lock().unwrap_or_else(|p| p.into_inner());

        let fingerprint = Self::fingerprint(&doc.bytes);
        let path = self.entry_path(&doc.source, &doc.filename);

        if let Some(entry) = self.load_entry(&path) {
            if entry.fingerprint == fingerprint {
                debug!("Cache hit for {}", doc.filename);
                return Ok((entry, CacheOutcome::Hit));
            }
            debug!("Fingerprint changed, rebuilding chunks for {}", doc.filename);
        }

        let entry = build_entry(doc, fingerprint)?;
        self.store_entry(&path, &entry);
        Ok((entry, CacheOutcome::Rebuilt))
    }

    /// Unconditional rebuild, replacing whatever is stored.
    pub fn force_reprocess(&self, doc: &LoadedDocument) -> Result<CachedDocument, ExtractionError> {
        let identity = doc.source.identity();
        let guard = self.lock_for(&identity);
        let _held = guard.lock().unwrap_or_else(|p| p.into_inner());

        let fingerprint = Self::fingerprint(&doc.bytes);
        let entry = build_entry(doc, fingerprint)?;
        self.store_entry(&self.entry_path(&doc.source, &doc.filename), &entry);
        Ok(entry)
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            entries: 0,
            chunks: 0,
            total_bytes: 0,
        };
        for path in self.entry_files() {
            if let Some(entry) = self.load_entry(&path) {
                stats.entries += 1;
                stats.chunks += entry.chunks.len();
                if let Ok(meta) = std::fs::metadata(&path) {
                    stats.total_bytes += meta.len();
                }
            }
        }
        stats
    }

    pub fn entries(&self) -> Vec<CacheEntrySummary> {
        self.entry_files()
            .into_iter()
            .filter_map(|path| self.load_entry(&path))
            .map(|entry| CacheEntrySummary {
                filename: entry.filename,
                category: entry.category,
                chunk_count: entry.chunks.len(),
                created_at: entry.created_at,
                fingerprint: entry.fingerprint.chars().take(8).collect(),
            })
            .collect()
    }

    /// Remove every stored entry.
    pub fn clear(&self) -> std::io::Result<()> {
        for path in self.entry_files() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────

    fn lock_for(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        locks
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn entry_path(&self, source: &DocumentSource, filename: &str) -> PathBuf {
        let stem = filename
            .rsplit_once('.')
            .map(|(s, _)| s)
            .unwrap_or(filename);
        let stem: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        let mut hasher = Sha256::new();
        hasher.update(source.identity().as_bytes());
        let key = hex_encode(&hasher.finalize());
        self.dir.join(format!("{}_{}.json", stem, &key[..12]))
    }

    fn entry_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .map(|rd| {
                rd.filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }

    fn load_entry(&self, path: &Path) -> Option<CachedDocument> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(_) => return None,
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                // Corrupted entry: recovered as a miss.
                warn!("Discarding unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn store_entry(&self, path: &Path, entry: &CachedDocument) {
        let result = serde_json::to_vec(entry)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                let tmp = path.with_extension("json.tmp");
                std::fs::write(&tmp, bytes)?;
                std::fs::rename(&tmp, path)
            });
        if let Err(e) = result {
            // The entry is still usable in memory; persisting is best effort.
            warn!("Failed to persist cache entry {}: {}", path.display(), e);
        }
    }
}

/// Extract, categorize, and chunk a document into a fresh cache entry.
fn build_entry(
    doc: &LoadedDocument,
    fingerprint: String,
) -> Result<CachedDocument, ExtractionError> {
    let extracted = document::extract_text(&doc.bytes, &doc.filename)?;
    let text = extracted.full_text();
    let category = chunker::infer_category(&doc.filename, &text);
    let strategy = ChunkStrategy::for_category(category);
    let chunks: Vec<Chunk> = chunker::chunk_text(&text, &strategy);

    debug!(
        "Chunked {} as {}: {} chunks ({} chars)",
        doc.filename,
        category,
        chunks.len(),
        text.chars().count()
    );

    Ok(CachedDocument {
        fingerprint,
        source: doc.source.identity(),
        filename: doc.filename.clone(),
        category,
        created_at: Utc::now(),
        chunks,
    })
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
