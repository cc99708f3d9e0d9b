//! Server-side log ingestion (spec §4.5): append-only persistence of
//! batches agents ship from their kernel/journal/syslog/application
//! cursors. No dedup — that guarantee lives entirely on the agent side.

pub mod metrics;
pub mod pipeline;
pub mod types;

pub use pipeline::LogIngestionService;
pub use types::{LogIngestionError, LogIngestionResult};
