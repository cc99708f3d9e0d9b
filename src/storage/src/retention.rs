//! Age-based retention sweep (spec §4.3): delete `metric_points_*` older
//! than `metrics_retention_days` and `log_entries` older than
//! `logs_retention_days`. Runs on a ticker from the lifecycle crate;
//! idempotent by construction (spec §8 invariant 6) since it's a pure
//! `DELETE ... WHERE timestamp < cutoff`.

use crate::db::Store;
use crate::types::StorageResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionReport {
    pub points_deleted: u64,
    pub logs_deleted: u64,
}

impl Store {
    pub async fn sweep_retention(
        &self,
        now: i64,
        metrics_retention_days: u32,
        logs_retention_days: u32,
    ) -> StorageResult<RetentionReport> {
        let metrics_cutoff = now - metrics_retention_days as i64 * 86_400;
        let logs_cutoff = now - logs_retention_days as i64 * 86_400;

        let conn = self.conn.lock().await;
        let int_deleted = conn.execute(
            "DELETE FROM metric_points_int WHERE timestamp_utc_sec < ?1",
            [metrics_cutoff],
        )?;
        let float_deleted = conn.execute(
            "DELETE FROM metric_points_float WHERE timestamp_utc_sec < ?1",
            [metrics_cutoff],
        )?;
        let logs_deleted = conn.execute(
            "DELETE FROM log_entries WHERE timestamp_utc_sec < ?1",
            [logs_cutoff],
        )?;

        Ok(RetentionReport {
            points_deleted: (int_deleted + float_deleted) as u64,
            logs_deleted: logs_deleted as u64,
        })
    }

    /// Deletes commands past their TTL that never reached a terminal state
    /// (spec §3 command lifecycle: `pending`/`delivered` → `expired`).
    /// Conditional `UPDATE ... WHERE status IN (...)` keeps this safe to
    /// run concurrently with an agent's own state transitions.
    pub async fn expire_stale_commands(&self, now: i64) -> StorageResult<u64> {
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE commands SET status = 'expired'
             WHERE status IN ('pending', 'delivered') AND (created_at + ttl_sec) < ?1",
            [now],
        )?;
        Ok(updated as u64)
    }

    /// Advisory lease so only one lifecycle task runs the sweep at a time
    /// even if misconfigured to start twice. Not a distributed lock —
    /// there's exactly one server process per datastore (spec §2 Non-goals).
    pub async fn try_acquire_retention_lease(&self, holder: &str, now: i64, lease_secs: i64) -> StorageResult<bool> {
        let conn = self.conn.lock().await;
        let expires_at = now + lease_secs;
        let acquired = conn.execute(
            "INSERT INTO retention_lease (id, holder, expires_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET holder = excluded.holder, expires_at = excluded.expires_at
             WHERE retention_lease.expires_at < ?3",
            rusqlite::params![holder, expires_at, now],
        )?;
        Ok(acquired > 0)
    }
}
