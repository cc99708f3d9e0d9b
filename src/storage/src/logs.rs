//! Log entry persistence (spec §4.5): append-only, no dedup — the agent's
//! cursor already guarantees each line is sent once.

use crate::db::Store;
use crate::types::{LogEntry, LogSource, StorageResult};

impl Store {
    pub async fn insert_log_entry(&self, entry: &LogEntry) -> StorageResult<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO log_entries (agent_id, source, timestamp_utc_sec, severity, message, unit, identifier, pid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                entry.agent_id,
                entry.source.as_str(),
                entry.timestamp_utc_sec,
                entry.severity,
                entry.message,
                entry.unit,
                entry.identifier,
                entry.pid,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub async fn count_log_entries(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT count(*) FROM log_entries", [], |r| r.get(0))?;
        Ok(count as u64)
    }

    pub async fn recent_logs_for_agent(&self, agent_id: &str, limit: u32) -> StorageResult<Vec<LogEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT log_id, agent_id, source, timestamp_utc_sec, severity, message, unit, identifier, pid
             FROM log_entries WHERE agent_id = ?1 ORDER BY timestamp_utc_sec DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![agent_id, limit], row_to_log_entry)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn row_to_log_entry(row: &rusqlite::Row) -> rusqlite::Result<LogEntry> {
    let source_str: String = row.get(2)?;
    Ok(LogEntry {
        log_id: row.get(0)?,
        agent_id: row.get(1)?,
        source: LogSource::from_str(&source_str).unwrap_or(LogSource::Application),
        timestamp_utc_sec: row.get(3)?,
        severity: row.get(4)?,
        message: row.get(5)?,
        unit: row.get(6)?,
        identifier: row.get(7)?,
        pid: row.get(8)?,
    })
}
