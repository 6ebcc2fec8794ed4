//! Configuration management for centinela
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory containing the PDF manuals to ingest
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name/identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension (must match model)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Compute device ("cpu" or "cuda")
    #[serde(default = "default_embedding_device")]
    pub device: String,

    /// Scale every output vector to unit L2 norm
    #[serde(default = "default_embedding_normalize")]
    pub normalize: bool,

    /// Batch size for embedding
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,
}

/// Compute device for embedding inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
    Cpu,
    Cuda,
}

impl FromStr for ComputeDevice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(ComputeDevice::Cpu),
            "cuda" | "gpu" => Ok(ComputeDevice::Cuda),
            other => Err(Error::Config(format!(
                "unknown compute device '{}': expected 'cpu' or 'cuda'",
                other
            ))),
        }
    }
}

impl EmbeddingConfig {
    /// Parse the configured device string
    pub fn device(&self) -> Result<ComputeDevice> {
        self.device.parse()
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap characters between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Number of chunks retrieved per question
    #[serde(default = "default_query_top_k")]
    pub top_k: usize,

    /// Timeout applied to the embedding call and the index query
    #[serde(default = "default_query_timeout_secs")]
    pub timeout_secs: u64,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for centinela data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Directory holding the persisted vector index
    pub index_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            embedding: EmbeddingConfig::default(),
            chunk: ChunkConfig::default(),
            query: QueryConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            device: default_embedding_device(),
            normalize: default_embedding_normalize(),
            batch_size: default_embedding_batch_size(),
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: default_query_top_k(),
            timeout_secs: default_query_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the default base directory for centinela (~/.centinela)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".centinela")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            index_dir: base.join("index"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::NotInitialized);
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Set up paths based on config file location
        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            index_dir: base.join("index"),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific base directory, falling back to defaults
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Check if centinela is initialized (config exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.config_file.exists()
    }

    /// Validate configuration. Runs before any processing begins.
    pub fn validate(&self) -> Result<()> {
        if self.chunk.chunk_size == 0 {
            return Err(Error::Config("chunk.chunk_size must be positive".to_string()));
        }

        if self.chunk.chunk_overlap >= self.chunk.chunk_size {
            return Err(Error::Config(
                "chunk.chunk_overlap must be < chunk.chunk_size".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(Error::Config(
                "embedding.batch_size must be positive".to_string(),
            ));
        }

        if self.query.top_k == 0 {
            return Err(Error::Config("query.top_k must be positive".to_string()));
        }

        if self.query.timeout_secs == 0 {
            return Err(Error::Config(
                "query.timeout_secs must be positive".to_string(),
            ));
        }

        // Device strings are rejected here rather than at first use
        self.embedding.device()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chunk.chunk_size, 1000);
        assert_eq!(config.chunk.chunk_overlap, 200);
        assert_eq!(config.query.top_k, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.init_paths(Some(tmp.path().to_path_buf()));
        config.data_dir = "manuals".to_string();

        config.save().unwrap();
        assert!(config.paths.config_file.exists());

        let loaded = Config::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(loaded.data_dir, "manuals");
        assert_eq!(loaded.paths.index_dir, tmp.path().join("index"));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let mut config = Config::default();

        config.chunk.chunk_overlap = config.chunk.chunk_size;
        assert!(config.validate().is_err());

        config.chunk.chunk_overlap = config.chunk.chunk_size - 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_parsing() {
        assert_eq!("cpu".parse::<ComputeDevice>().unwrap(), ComputeDevice::Cpu);
        assert_eq!("CUDA".parse::<ComputeDevice>().unwrap(), ComputeDevice::Cuda);
        assert!("tpu".parse::<ComputeDevice>().is_err());

        let mut config = Config::default();
        config.embedding.device = "tpu".to_string();
        assert!(config.validate().is_err());
    }
}
