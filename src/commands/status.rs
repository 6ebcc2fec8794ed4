//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::store::{IndexStats, VectorStore};
use serde::Serialize;

/// System status snapshot
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub data_dir: String,
    pub index: IndexStats,
}

/// Collect index statistics for display.
pub async fn cmd_status(config: &Config, store: &VectorStore) -> Result<StatusReport> {
    Ok(StatusReport {
        data_dir: config.data_dir.clone(),
        index: store.stats().await,
    })
}

/// Print status to the console
pub fn print_status(status: &StatusReport) {
    println!("\nCentinela status");
    println!("  Manuals directory: {}", status.data_dir);
    println!("  Index: {}", status.index.path);
    println!("  Embedding model: {} ({} dims)", status.index.model, status.index.dimension);
    println!("  Indexed chunks: {}", status.index.entry_count);
}
