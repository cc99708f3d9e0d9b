//! Ingestion-layer error taxonomy (spec §4.2).

use rackwatch_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("batch agent_id does not match the authenticated bearer identity")]
    Forbidden,
    #[error("malformed batch: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type IngestionResult<T> = Result<T, IngestionError>;
