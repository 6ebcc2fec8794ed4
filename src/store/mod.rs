//! Local vector index
//!
//! A directory-persisted nearest-neighbor store for embedded manual
//! chunks. Entries are written once at ingestion time and are immutable
//! afterwards; there is no update or delete path.
//!
//! Persistence: the whole index lives in `index.json` under the configured
//! directory. Batch upserts serialize to a temporary file and rename it
//! into place, so a batch is all-or-nothing and readers never observe a
//! partially written file. In-process, readers share a `RwLock` read guard
//! and run concurrently; the single writer takes the lock exclusively.

use crate::chunk::{compute_text_hash, ChunkMetadata};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// On-disk format version
const INDEX_FORMAT_VERSION: u32 = 1;

/// Index file name within the index directory
const INDEX_FILE: &str = "index.json";

/// One persisted chunk: embedding, text, and attribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl IndexEntry {
    /// Build an entry with a deterministic id derived from its source
    /// position and content hash, so re-ingesting identical input yields
    /// identical ids.
    pub fn new(vector: Vec<f32>, text: String, metadata: ChunkMetadata, chunk_index: usize) -> Self {
        let key = format!(
            "{}:{}:{}:{}",
            metadata.source_file,
            metadata.page,
            chunk_index,
            compute_text_hash(&text)
        );
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes());

        Self {
            id,
            vector,
            text,
            metadata,
        }
    }
}

/// One search hit, closest first in a result list
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

/// Index statistics for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub entry_count: usize,
    pub model: String,
    pub dimension: usize,
    pub path: String,
}

/// Envelope written to disk
#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    model: String,
    dimension: usize,
    entries: Vec<IndexEntry>,
}

/// Directory-persisted vector store
#[derive(Debug)]
pub struct VectorStore {
    file: PathBuf,
    model: String,
    dimension: usize,
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorStore {
    /// Open (or create) the index under `dir`.
    ///
    /// An existing index written by a different model or dimension is
    /// rejected with remediation guidance rather than silently reused.
    pub fn open(dir: &Path, model: &str, dimension: usize) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let file = dir.join(INDEX_FILE);

        let entries = if file.exists() {
            let content = std::fs::read_to_string(&file)?;
            let persisted: PersistedIndex = serde_json::from_str(&content)
                .map_err(|e| Error::Store(format!("corrupt index file {}: {}", file.display(), e)))?;

            if persisted.version != INDEX_FORMAT_VERSION {
                return Err(Error::Store(format!(
                    "index format version {} is not supported (expected {}); \
                     delete {} and re-ingest",
                    persisted.version,
                    INDEX_FORMAT_VERSION,
                    file.display()
                )));
            }

            if persisted.model != model || persisted.dimension != dimension {
                return Err(Error::Store(format!(
                    "index at {} was built with model '{}' ({} dims), but the \
                     configuration expects '{}' ({} dims). Remediation: point \
                     the configuration at a new index directory or delete the \
                     index and re-ingest.",
                    file.display(),
                    persisted.model,
                    persisted.dimension,
                    model,
                    dimension
                )));
            }

            info!("Loaded {} entries from {}", persisted.entries.len(), file.display());
            persisted.entries
        } else {
            debug!("No existing index at {}", file.display());
            Vec::new()
        };

        Ok(Self {
            file,
            model: model.to_string(),
            dimension,
            entries: RwLock::new(entries),
        })
    }

    /// Append a batch of entries durably. All-or-nothing: the persisted
    /// file is replaced only after the full batch serializes.
    pub async fn upsert(&self, batch: Vec<IndexEntry>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        if let Some(mismatch) = batch.iter().find(|e| e.vector.len() != self.dimension) {
            return Err(Error::Store(format!(
                "Vector dimension mismatch: model '{}' expects {} (got {})",
                self.model,
                self.dimension,
                mismatch.vector.len()
            )));
        }

        let mut entries = self.entries.write().await;

        debug!("Upserting {} entries to {}", batch.len(), self.file.display());

        let previous_len = entries.len();
        entries.extend(batch);

        if let Err(e) = self.persist(&entries) {
            // Roll the in-memory state back so memory and disk agree
            entries.truncate(previous_len);
            return Err(e);
        }

        Ok(())
    }

    /// Serialize all entries and swap the index file into place.
    fn persist(&self, entries: &[IndexEntry]) -> Result<()> {
        let persisted = PersistedIndex {
            version: INDEX_FORMAT_VERSION,
            model: self.model.clone(),
            dimension: self.dimension,
            entries: entries.to_vec(),
        };

        let tmp = self.file.with_extension("json.tmp");
        let content = serde_json::to_string(&persisted)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.file)?;

        debug!("Persisted {} entries", entries.len());
        Ok(())
    }

    /// Return the `k` entries most similar to `query`, descending by
    /// cosine similarity, ties broken by insertion order.
    ///
    /// An empty index yields an empty result, not an error; `k` larger
    /// than the index yields every entry.
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimension {
            return Err(Error::Store(format!(
                "query vector has {} dims, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let entries = self.entries.read().await;

        let mut scored: Vec<SearchResult> = entries
            .iter()
            .map(|e| SearchResult {
                text: e.text.clone(),
                metadata: e.metadata.clone(),
                score: cosine_similarity(query, &e.vector),
            })
            .collect();

        // Stable sort keeps insertion order for equal scores
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Number of entries in the index
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Statistics for status reporting
    pub async fn stats(&self) -> IndexStats {
        IndexStats {
            entry_count: self.entries.read().await.len(),
            model: self.model.clone(),
            dimension: self.dimension,
            path: self.file.display().to_string(),
        }
    }
}

/// Cosine similarity; zero-norm vectors score 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
