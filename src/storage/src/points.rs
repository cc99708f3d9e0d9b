//! Point storage: dual int/float tables keyed by `(series_id, timestamp)`
//! (spec §3, §4.2). Insertion is idempotent — re-sending the same point
//! (same series, same second) overwrites in place rather than duplicating
//! (spec §8 invariant 2).

use crate::db::Store;
use crate::types::{StorageResult, ValueKind};

impl Store {
    /// Inserts one point into the table matching `kind`. Returns an error
    /// if `kind` doesn't match the series' established `value_kind` — the
    /// caller (ingestion) turns that into a per-sample rejection rather
    /// than failing the whole batch.
    pub async fn insert_point(
        &self,
        series_id: i64,
        kind: ValueKind,
        timestamp_utc_sec: i64,
        value: f64,
    ) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        match kind {
            ValueKind::Int => {
                conn.execute(
                    "INSERT INTO metric_points_int (series_id, timestamp_utc_sec, value)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(series_id, timestamp_utc_sec) DO UPDATE SET value = excluded.value",
                    rusqlite::params![series_id, timestamp_utc_sec, value as i64],
                )?;
            }
            ValueKind::Float => {
                conn.execute(
                    "INSERT INTO metric_points_float (series_id, timestamp_utc_sec, value)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(series_id, timestamp_utc_sec) DO UPDATE SET value = excluded.value",
                    rusqlite::params![series_id, timestamp_utc_sec, value],
                )?;
            }
        }
        Ok(())
    }

    /// Raw points for a series in `[from, to]`, ordered by time — the
    /// shared building block for `LatestValue`, `Timeseries`, and `Rate`
    /// (spec §4.4).
    pub async fn points_in_range(
        &self,
        series_id: i64,
        kind: ValueKind,
        from: i64,
        to: i64,
    ) -> StorageResult<Vec<(i64, f64)>> {
        let conn = self.conn.lock().await;
        let (table, is_int) = match kind {
            ValueKind::Int => ("metric_points_int", true),
            ValueKind::Float => ("metric_points_float", false),
        };
        let sql = format!(
            "SELECT timestamp_utc_sec, value FROM {table}
             WHERE series_id = ?1 AND timestamp_utc_sec BETWEEN ?2 AND ?3
             ORDER BY timestamp_utc_sec ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params![series_id, from, to], |row| {
            let ts: i64 = row.get(0)?;
            let value: f64 = if is_int {
                row.get::<_, i64>(1)? as f64
            } else {
                row.get(1)?
            };
            Ok((ts, value))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub async fn latest_point(&self, series_id: i64, kind: ValueKind) -> StorageResult<Option<(i64, f64)>> {
        let conn = self.conn.lock().await;
        let (table, is_int) = match kind {
            ValueKind::Int => ("metric_points_int", true),
            ValueKind::Float => ("metric_points_float", false),
        };
        let sql = format!(
            "SELECT timestamp_utc_sec, value FROM {table}
             WHERE series_id = ?1 ORDER BY timestamp_utc_sec DESC LIMIT 1"
        );
        let result = conn.query_row(&sql, [series_id], |row| {
            let ts: i64 = row.get(0)?;
            let value: f64 = if is_int {
                row.get::<_, i64>(1)? as f64
            } else {
                row.get(1)?
            };
            Ok((ts, value))
        });
        match result {
            Ok(point) => Ok(Some(point)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
