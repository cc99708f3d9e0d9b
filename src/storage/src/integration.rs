//! Façade used by the other workspace crates: a single `StorageHandle`
//! type alias plus the aggregate stats view backing `GET /api/stats`
//! (spec §6.1).

use crate::db::Store;
use crate::types::StorageResult;

pub type StorageHandle = Store;

#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub agent_count: u64,
    pub series_count: u64,
    pub point_count: u64,
    pub log_count: u64,
    pub command_count: u64,
}

impl Store {
    pub async fn stats(&self) -> StorageResult<StorageStats> {
        let conn = self.conn.lock().await;
        let agent_count: i64 = conn.query_row("SELECT count(*) FROM agents WHERE revoked = 0", [], |r| r.get(0))?;
        let series_count: i64 = conn.query_row("SELECT count(*) FROM metric_series", [], |r| r.get(0))?;
        let int_points: i64 = conn.query_row("SELECT count(*) FROM metric_points_int", [], |r| r.get(0))?;
        let float_points: i64 = conn.query_row("SELECT count(*) FROM metric_points_float", [], |r| r.get(0))?;
        let log_count: i64 = conn.query_row("SELECT count(*) FROM log_entries", [], |r| r.get(0))?;
        let command_count: i64 = conn.query_row("SELECT count(*) FROM commands", [], |r| r.get(0))?;

        Ok(StorageStats {
            agent_count: agent_count as u64,
            series_count: series_count as u64,
            point_count: (int_points + float_points) as u64,
            log_count: log_count as u64,
            command_count: command_count as u64,
        })
    }

    /// Liveness check backing `GET /health` (spec §6.1): a trivial query
    /// against the datastore, not just "process is running".
    pub async fn health_check(&self) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}
