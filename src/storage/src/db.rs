//! Connection management: one SQLite file per server (spec §6.3), WAL mode,
//! busy timeout, foreign keys on. Grounded on the pragma set used by the
//! `macwilam-linksense` reference database layer.

use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::schema;
use crate::types::{StorageError, StorageResult};

/// Single shared connection behind an async mutex. SQLite serializes
/// writers anyway; this avoids a connection pool for a single-file store.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(db_path: &str) -> StorageResult<Self> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        schema::create_schema(&conn)?;

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// In-memory store used by this crate's own tests and by every other
    /// workspace crate's test suite (`cfg(test)` doesn't cross the crate
    /// boundary, so this has to be a real public function, not test-gated).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        schema::create_schema(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Periodic housekeeping, run alongside the retention sweep (spec §4.3):
    /// truncate the WAL and reclaim space freed by deletes.
    pub async fn checkpoint_and_vacuum(&self) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE); VACUUM;")?;
        Ok(())
    }
}

pub(crate) fn map_row_not_found(err: rusqlite::Error, what: &str) -> StorageError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound(what.to_string()),
        other => StorageError::Sqlite(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_in_memory_and_checkpoints() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.checkpoint_and_vacuum().await.is_ok());
    }
}
