//! FastEmbed implementation for local embeddings

use super::{normalize_embedding, Embedder};
use crate::config::{ComputeDevice, EmbeddingConfig};
use crate::error::{Error, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// FastEmbed-based embedder
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl FastEmbedder {
    /// Create a new FastEmbed embedder.
    ///
    /// Fails fast on an unknown model identifier or an unavailable compute
    /// device; there is no silent fallback to a different model or to CPU.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        match config.device()? {
            ComputeDevice::Cpu => {}
            ComputeDevice::Cuda => {
                return Err(Error::Config(
                    "device 'cuda' requested but this build carries no CUDA execution \
                     provider; set embedding.device = \"cpu\" or install a GPU-enabled build"
                        .to_string(),
                ));
            }
        }

        let model_enum = resolve_model(&config.model)?;

        info!("Initializing FastEmbed with model: {}", config.model);

        let options = InitOptions::new(model_enum).with_show_download_progress(true);

        let model = TextEmbedding::try_new(options)
            .map_err(|e| Error::Embedding(format!("Failed to initialize model: {}", e)))?;

        info!("FastEmbed model loaded successfully");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: config.model.clone(),
            dimension: config.dimension,
            normalize: config.normalize,
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Embedding {} texts", texts.len());

        // FastEmbed is synchronous, so we wrap in blocking task
        let model = self.model.clone();
        let embeddings = tokio::task::spawn_blocking(move || {
            let model = model.blocking_lock();
            model.embed(texts, None)
        })
        .await
        .map_err(|e| Error::Embedding(format!("Task join error: {}", e)))?
        .map_err(|e| Error::Embedding(format!("Embedding failed: {}", e)))?;

        if self.normalize {
            Ok(embeddings.iter().map(|v| normalize_embedding(v)).collect())
        } else {
            Ok(embeddings)
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Map a model identifier to fastembed's catalog
fn resolve_model(model: &str) -> Result<EmbeddingModel> {
    match model {
        "BAAI/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "BAAI/bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
        "sentence-transformers/all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        other => Err(Error::Config(format!(
            "unknown embedding model '{}'; supported: BAAI/bge-small-en-v1.5, \
             BAAI/bge-base-en-v1.5, BAAI/bge-large-en-v1.5, \
             sentence-transformers/all-MiniLM-L6-v2",
            other
        ))),
    }
}

/// Get the expected dimension for a known model
pub fn get_model_dimension(model_name: &str) -> Option<usize> {
    match model_name {
        "BAAI/bge-small-en-v1.5" => Some(384),
        "BAAI/bge-base-en-v1.5" => Some(768),
        "BAAI/bge-large-en-v1.5" => Some(1024),
        "sentence-transformers/all-MiniLM-L6-v2" => Some(384),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_dimensions() {
        assert_eq!(get_model_dimension("BAAI/bge-small-en-v1.5"), Some(384));
        assert_eq!(get_model_dimension("BAAI/bge-base-en-v1.5"), Some(768));
        assert_eq!(get_model_dimension("unknown-model"), None);
    }

    #[test]
    fn test_unknown_model_is_a_config_error() {
        let config = EmbeddingConfig {
            model: "sentence-transformers/all-mpnet-base-v2".to_string(),
            ..EmbeddingConfig::default()
        };

        match FastEmbedder::new(&config) {
            Err(Error::Config(msg)) => assert!(msg.contains("unknown embedding model")),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_cuda_without_provider_is_a_config_error() {
        let config = EmbeddingConfig {
            device: "cuda".to_string(),
            ..EmbeddingConfig::default()
        };

        match FastEmbedder::new(&config) {
            Err(Error::Config(msg)) => assert!(msg.contains("cuda")),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    // Integration test - requires model download
    #[tokio::test]
    #[ignore] // Run manually with: cargo test -- --ignored
    async fn test_fastembed_integration() {
        let config = EmbeddingConfig::default();

        let embedder = FastEmbedder::new(&config).unwrap();
        let texts = vec!["Hello world".to_string(), "Test embedding".to_string()];

        let embeddings = embedder.embed(texts).await.unwrap();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 384);

        let norm: f32 = embeddings[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
