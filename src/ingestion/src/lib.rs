//! Ingestion pipeline (spec §4.2): batch validation, series reconciliation,
//! and idempotent point append for authenticated agents.

pub mod metrics;
pub mod pipeline;
pub mod types;

pub use pipeline::IngestionService;
pub use types::{IngestionError, IngestionResult};
