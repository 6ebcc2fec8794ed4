//! Default values for configuration

/// Default embedding model (BAAI/bge-small-en-v1.5)
pub fn default_embedding_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}

/// Default embedding dimension for bge-small-en-v1.5
pub fn default_embedding_dimension() -> usize {
    384
}

/// Default compute device
pub fn default_embedding_device() -> String {
    "cpu".to_string()
}

/// Default: normalize embeddings to unit L2 norm
pub fn default_embedding_normalize() -> bool {
    true
}

/// Default batch size for embedding
pub fn default_embedding_batch_size() -> usize {
    32
}

/// Default maximum characters per chunk
pub fn default_chunk_size() -> usize {
    1000
}

/// Default overlap characters between chunks
pub fn default_chunk_overlap() -> usize {
    200
}

/// Default number of chunks retrieved per question
pub fn default_query_top_k() -> usize {
    3
}

/// Default timeout for embedding and index queries, in seconds
pub fn default_query_timeout_secs() -> u64 {
    30
}

/// Default input directory for PDF manuals
pub fn default_data_dir() -> String {
    "data".to_string()
}
