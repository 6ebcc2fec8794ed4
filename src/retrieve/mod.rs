//! Retrieval and context assembly
//!
//! Turns a technician's free-text question into a source-attributed
//! context string for the language-model host: embed the question, pull
//! the nearest manual chunks from the index, and concatenate them with
//! `[Source: <file> - Page <n>]` tags.
//!
//! The service is built once at startup with a shared embedder and store
//! and passed by reference to whoever handles requests; nothing here is a
//! process-wide singleton.

use crate::config::QueryConfig;
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::store::{SearchResult, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Returned when a valid query matches nothing in the index. A sentinel,
/// not an error.
pub const NO_MATCH_SENTINEL: &str = "No relevant information found in the indexed manuals.";

/// Long-lived retrieval service
pub struct RetrievalService {
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    top_k: usize,
    timeout: Duration,
    timeout_secs: u64,
}

impl RetrievalService {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<VectorStore>, config: &QueryConfig) -> Self {
        Self {
            embedder,
            store,
            top_k: config.top_k,
            timeout: Duration::from_secs(config.timeout_secs),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Answer-context lookup for the manual-consultation tool.
    ///
    /// Embeds the question and assembles the text of every retrieved
    /// chunk, each prefixed with its source tag and separated by blank
    /// lines. Zero hits yield [`NO_MATCH_SENTINEL`].
    pub async fn consult_manual(&self, question: &str) -> Result<String> {
        let results = self.search(question, self.top_k).await?;

        if results.is_empty() {
            debug!("No chunks retrieved for question");
            return Ok(NO_MATCH_SENTINEL.to_string());
        }

        Ok(assemble_context(&results))
    }

    /// Retrieve the `k` nearest chunks for a question.
    ///
    /// Both the embedding call and the index query run under a bounded
    /// timeout; hitting it surfaces `Error::Timeout` instead of hanging.
    pub async fn search(&self, question: &str, k: usize) -> Result<Vec<SearchResult>> {
        info!("Retrieving top-{} chunks", k);

        let embeddings = tokio::time::timeout(
            self.timeout,
            self.embedder.embed(vec![question.to_string()]),
        )
        .await
        .map_err(|_| Error::Timeout(self.timeout_secs))??;

        let query_vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embedding returned".to_string()))?;

        let results = tokio::time::timeout(self.timeout, self.store.search(&query_vector, k))
            .await
            .map_err(|_| Error::Timeout(self.timeout_secs))??;

        debug!("Retrieved {} chunk(s)", results.len());
        Ok(results)
    }
}

/// Concatenate every retrieved chunk with its attribution tag.
///
/// All results are accumulated; retrieval returning k chunks always
/// produces k tagged sections.
pub fn assemble_context(results: &[SearchResult]) -> String {
    let sections: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "[Source: {} - Page {}]\n{}",
                r.metadata.source_file, r.metadata.page, r.text
            )
        })
        .collect();

    sections.join("\n\n")
}
