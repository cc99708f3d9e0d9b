//! Log-ingestion error taxonomy (spec §4.5).

use rackwatch_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogIngestionError {
    #[error("batch agent_id does not match the authenticated bearer identity")]
    Forbidden,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type LogIngestionResult<T> = Result<T, LogIngestionError>;
