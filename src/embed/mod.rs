//! Embedding generation
//!
//! This module provides an abstraction over embedding models with:
//! - A trait for different embedding backends
//! - Local embedding support via fastembed
//! - Batch processing for efficiency
//!
//! The backend is constructed once at startup and shared for the life of
//! the process; ingestion and retrieval both borrow the same instance.

#[cfg(feature = "local-embed")]
mod fastembed_impl;

#[cfg(feature = "local-embed")]
pub use fastembed_impl::*;

use crate::config::EmbeddingConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, order preserved
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Scale a vector to unit L2 norm. Zero vectors are returned unchanged.
pub fn normalize_embedding(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|v| v / norm).collect()
}

/// Create an embedder based on configuration
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    #[cfg(feature = "local-embed")]
    {
        let embedder = FastEmbedder::new(config)?;
        Ok(Box::new(embedder))
    }

    #[cfg(not(feature = "local-embed"))]
    {
        let _ = config;
        Err(crate::error::Error::Embedding(
            "No embedding backend available. Enable 'local-embed' feature.".to_string(),
        ))
    }
}

/// Helper to embed in batches. Output is identical to a single-batch call.
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for chunk in texts.chunks(batch_size.max(1)) {
        let batch_texts: Vec<String> = chunk.to_vec();
        let embeddings = embedder.embed(batch_texts).await?;
        all_embeddings.extend(embeddings);
    }

    Ok(all_embeddings)
}

/// Deterministic in-process embedder for pipeline tests. Never downloads a
/// model; identical text always maps to the identical unit vector.
#[cfg(test)]
pub mod testing {
    use super::*;

    pub struct HashEmbedder {
        dimension: usize,
    }

    impl HashEmbedder {
        pub fn new(dimension: usize) -> Self {
            Self { dimension }
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            let hash = blake3::hash(text.as_bytes());
            let bytes = hash.as_bytes();
            let raw: Vec<f32> = (0..self.dimension)
                .map(|i| {
                    let b = bytes[i % bytes.len()];
                    let salt = (i / bytes.len()) as u8;
                    (b.wrapping_add(salt) as f32 / 127.5) - 1.0
                })
                .collect();
            normalize_embedding(&raw)
        }
    }

    #[async_trait]
    impl Embedder for HashEmbedder {
        async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| self.vector_for(t)).collect())
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_name(&self) -> &str {
            "test/hash-embedder"
        }
    }
}
