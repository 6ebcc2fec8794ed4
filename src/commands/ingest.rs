//! Ingest command implementation
//!
//! The offline batch pipeline: discover PDF manuals, extract pages, chunk,
//! embed, and append everything to the vector index in one atomic batch.
//! A file that fails to load is logged and skipped; an input directory
//! with no PDFs aborts the run before the index is touched.

use crate::chunk::{chunk_document, Chunk};
use crate::config::Config;
use crate::embed::Embedder;
use crate::error::Result;
use crate::load::{discover_pdfs, load_document};
use crate::store::{IndexEntry, VectorStore};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, warn};

/// Statistics from an ingestion run
#[derive(Debug, Default, serde::Serialize)]
pub struct IngestStats {
    pub docs_processed: usize,
    pub docs_skipped: usize,
    pub pages_loaded: usize,
    pub chunks_created: usize,
    pub errors: Vec<String>,
}

/// Ingest every PDF manual under `dir` into the vector index.
pub async fn cmd_ingest(
    config: &Config,
    embedder: &dyn Embedder,
    store: &VectorStore,
    dir: &Path,
) -> Result<IngestStats> {
    info!("Ingesting manuals from {}", dir.display());

    // Fatal when nothing matches; the index stays untouched
    let files = discover_pdfs(dir)?;

    let mut stats = IngestStats::default();
    let mut chunks: Vec<Chunk> = Vec::new();

    for file_path in &files {
        match load_document(file_path) {
            Ok(doc) => {
                let before = chunks.len();
                stats.pages_loaded += doc.pages.len();
                chunks.extend(chunk_document(&doc, &config.chunk));
                info!(
                    "{}: {} page(s), {} chunk(s)",
                    doc.file_name,
                    doc.pages.len(),
                    chunks.len() - before
                );
                stats.docs_processed += 1;
            }
            Err(e) => {
                // Per-file failures are non-fatal; keep going
                warn!("{}", e);
                stats.errors.push(e.to_string());
                stats.docs_skipped += 1;
            }
        }
    }

    if chunks.is_empty() {
        info!("No text chunks produced; index unchanged");
        return Ok(stats);
    }

    stats.chunks_created = chunks.len();

    let vectors = embed_with_progress(embedder, &chunks, config.embedding.batch_size).await?;

    let entries: Vec<IndexEntry> = chunks
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (chunk, vector))| IndexEntry::new(vector, chunk.text, chunk.metadata, i))
        .collect();

    // Single atomic batch: either every chunk lands or none do
    store.upsert(entries).await?;

    info!(
        "Ingestion complete: {} doc(s), {} page(s), {} chunk(s) indexed",
        stats.docs_processed, stats.pages_loaded, stats.chunks_created
    );

    Ok(stats)
}

/// Embed all chunk texts in batches, ticking a progress bar per batch.
async fn embed_with_progress(
    embedder: &dyn Embedder,
    chunks: &[Chunk],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} embedding {pos}/{len} [{bar:30}] {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut vectors = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size.max(1)) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embedded = embedder.embed(texts).await?;
        pb.inc(embedded.len() as u64);
        vectors.extend(embedded);
    }
    pb.finish_and_clear();

    Ok(vectors)
}

/// Print an ingestion summary to the console
pub fn print_ingest_stats(stats: &IngestStats) {
    println!("\n✓ Ingestion complete");
    println!("  Documents processed: {}", stats.docs_processed);
    println!("  Documents skipped: {}", stats.docs_skipped);
    println!("  Pages loaded: {}", stats.pages_loaded);
    println!("  Chunks indexed: {}", stats.chunks_created);

    for error in &stats.errors {
        println!("  ⚠ {}", error);
    }
}
