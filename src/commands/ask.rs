//! Ask command implementation

use crate::error::Result;
use crate::retrieve::{assemble_context, RetrievalService, NO_MATCH_SENTINEL};
use crate::store::SearchResult;
use serde::Serialize;
use tracing::info;

/// Result of one retrieval, for display or JSON output
#[derive(Debug, Serialize)]
pub struct AskResult {
    pub question: String,
    pub context: String,
    pub results: Vec<SearchResult>,
}

/// Retrieve manual context for a question.
pub async fn cmd_ask(service: &RetrievalService, question: &str, k: usize) -> Result<AskResult> {
    info!("Question: {}", question);

    let results = service.search(question, k).await?;

    let context = if results.is_empty() {
        NO_MATCH_SENTINEL.to_string()
    } else {
        assemble_context(&results)
    };

    Ok(AskResult {
        question: question.to_string(),
        context,
        results,
    })
}

/// Print retrieval output to the console
pub fn print_ask_result(result: &AskResult) {
    println!("\n🔍 {}\n", result.question);

    if result.results.is_empty() {
        println!("{}", result.context);
        return;
    }

    for (i, r) in result.results.iter().enumerate() {
        println!(
            "{}. [score: {:.3}] {} - Page {}",
            i + 1,
            r.score,
            r.metadata.source_file,
            r.metadata.page
        );
    }

    println!("\n{}", result.context);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkMetadata;
    use crate::config::QueryConfig;
    use crate::embed::testing::HashEmbedder;
    use crate::embed::Embedder;
    use crate::store::{IndexEntry, VectorStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ask_empty_index_reports_sentinel() {
        let tmp = TempDir::new().unwrap();
        let embedder = Arc::new(HashEmbedder::new(8));
        let store = Arc::new(VectorStore::open(tmp.path(), embedder.model_name(), 8).unwrap());
        let service = RetrievalService::new(embedder, store, &QueryConfig::default());

        let result = cmd_ask(&service, "siren wiring", 3).await.unwrap();
        assert_eq!(result.context, NO_MATCH_SENTINEL);
        assert!(result.results.is_empty());
    }

    #[tokio::test]
    async fn test_ask_honors_custom_limit() {
        let tmp = TempDir::new().unwrap();
        let embedder = Arc::new(HashEmbedder::new(8));
        let store = Arc::new(VectorStore::open(tmp.path(), embedder.model_name(), 8).unwrap());

        let mut batch = Vec::new();
        for i in 0..5 {
            let text = format!("zone {} wiring notes", i);
            let vector = embedder.embed(vec![text.clone()]).await.unwrap().remove(0);
            batch.push(IndexEntry::new(
                vector,
                text,
                ChunkMetadata {
                    source_file: "zones.pdf".to_string(),
                    page: i + 1,
                },
                i as usize,
            ));
        }
        store.upsert(batch).await.unwrap();

        let service = RetrievalService::new(embedder, store, &QueryConfig::default());
        let result = cmd_ask(&service, "zone wiring", 2).await.unwrap();

        assert_eq!(result.results.len(), 2);
        assert_eq!(result.context.matches("[Source: zones.pdf").count(), 2);
    }
}
