//! Scheduler & lifecycle error taxonomy (spec §4.7).

use rackwatch_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Outcome of one combined retention/command-TTL sweep (spec §4.7 "the
/// retention sweep, the command-TTL sweep, and any other periodic work
/// must run on the same single-ticker loop").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub points_deleted: u64,
    pub logs_deleted: u64,
    pub commands_expired: u64,
}
