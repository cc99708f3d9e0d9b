//! Command-plane error taxonomy (spec §4.6).

use rackwatch_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command does not belong to this agent")]
    Forbidden,
    #[error("stored payload failed to deserialize: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type CommandResult<T> = Result<T, CommandError>;
