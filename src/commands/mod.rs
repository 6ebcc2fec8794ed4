//! Command implementations
//!
//! Each command takes its dependencies (config, embedder, store, retrieval
//! service) by reference; construction happens once in `main`.

mod ask;
mod ingest;
mod init;
mod status;

pub use ask::{cmd_ask, print_ask_result, AskResult};
pub use ingest::{cmd_ingest, print_ingest_stats, IngestStats};
pub use init::cmd_init;
pub use status::{cmd_status, print_status, StatusReport};
