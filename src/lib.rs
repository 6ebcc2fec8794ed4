//! centinela: manual-grounded maintenance assistant for electronic-security
//! technicians
//!
//! Two pipelines share one persisted index. The ingestion pipeline loads
//! PDF manuals, splits them into overlapping chunks, embeds each chunk,
//! and appends the results to a directory-persisted vector index. The
//! retrieval pipeline embeds a technician's question, pulls the nearest
//! chunks, and assembles a source-attributed context string for the
//! conversational host, alongside two stateless field tools (maintenance
//! reports and CCTV bandwidth sizing).

pub mod chunk;
pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod load;
pub mod retrieve;
pub mod store;
pub mod tools;
