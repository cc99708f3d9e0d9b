//! Series catalog: find-or-create the `(agent_id, metric_name, labels)`
//! identity for an incoming sample (spec §4.3 schema, §8 invariant 1: "two
//! samples with the same metric name and canonical label set always
//! resolve to the same series_id").

use rackwatch_core::labels::LabelSet;

use crate::db::{map_row_not_found, Store};
use crate::types::{MetricSeries, StorageResult, ValueKind};

impl Store {
    /// Looks up a series by its canonical identity; creates it on first
    /// sight. The `UNIQUE(agent_id, metric_name, labels_hash, labels)`
    /// constraint makes concurrent first-sight inserts race-safe: the
    /// loser's `INSERT OR IGNORE` is a no-op and it simply re-reads.
    pub async fn find_or_create_series(
        &self,
        agent_id: &str,
        metric_name: &str,
        labels: &LabelSet,
        kind: ValueKind,
        now: i64,
    ) -> StorageResult<(MetricSeries, bool)> {
        let canonical = labels.canonical_string();
        let hash = labels.canonical_hash() as i64;

        let conn = self.conn.lock().await;

        if let Some(existing) = lookup(&conn, agent_id, metric_name, &canonical, hash)? {
            return Ok((existing, false));
        }

        conn.execute(
            "INSERT OR IGNORE INTO metric_series (agent_id, metric_name, labels, labels_hash, value_kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![agent_id, metric_name, canonical, hash, kind.as_str(), now],
        )?;

        let series = lookup(&conn, agent_id, metric_name, &canonical, hash)?
            .ok_or_else(|| map_row_not_found(rusqlite::Error::QueryReturnedNoRows, "metric_series"))?;
        let created = series.created_at == now;
        Ok((series, created))
    }

    pub async fn get_series(&self, series_id: i64) -> StorageResult<MetricSeries> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT series_id, agent_id, metric_name, labels, labels_hash, value_kind, created_at
             FROM metric_series WHERE series_id = ?1",
            [series_id],
            row_to_series,
        )
        .map_err(|e| map_row_not_found(e, "metric_series"))
    }

    pub async fn list_series_by_name(&self, metric_name: &str) -> StorageResult<Vec<MetricSeries>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT series_id, agent_id, metric_name, labels, labels_hash, value_kind, created_at
             FROM metric_series WHERE metric_name = ?1",
        )?;
        let rows = stmt.query_map([metric_name], row_to_series)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn lookup(
    conn: &rusqlite::Connection,
    agent_id: &str,
    metric_name: &str,
    canonical_labels: &str,
    hash: i64,
) -> StorageResult<Option<MetricSeries>> {
    let result = conn.query_row(
        "SELECT series_id, agent_id, metric_name, labels, labels_hash, value_kind, created_at
         FROM metric_series WHERE agent_id = ?1 AND metric_name = ?2 AND labels_hash = ?3 AND labels = ?4",
        rusqlite::params![agent_id, metric_name, hash, canonical_labels],
        row_to_series,
    );
    match result {
        Ok(series) => Ok(Some(series)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_to_series(row: &rusqlite::Row) -> rusqlite::Result<MetricSeries> {
    let labels_str: String = row.get(3)?;
    let kind_str: String = row.get(5)?;
    Ok(MetricSeries {
        series_id: row.get(0)?,
        agent_id: row.get(1)?,
        metric_name: row.get(2)?,
        labels: parse_canonical_labels(&labels_str),
        labels_hash: row.get(4)?,
        value_kind: ValueKind::from_str(&kind_str).unwrap_or(ValueKind::Float),
        created_at: row.get(6)?,
    })
}

/// Inverse of `LabelSet::canonical_string` — splits on unescaped `,`/`=`.
fn parse_canonical_labels(s: &str) -> LabelSet {
    if s.is_empty() {
        return LabelSet::new();
    }
    let mut pairs = Vec::new();
    for part in split_unescaped(s, ',') {
        if let Some((k, v)) = split_unescaped(&part, '=').into_iter().collect_kv() {
            pairs.push((unescape(&k), unescape(&v)));
        }
    }
    LabelSet::from_pairs(pairs)
}

trait CollectKv {
    fn collect_kv(self) -> Option<(String, String)>;
}

impl CollectKv for Vec<String> {
    fn collect_kv(self) -> Option<(String, String)> {
        let mut it = self.into_iter();
        let k = it.next()?;
        let v = it.next().unwrap_or_default();
        Some((k, v))
    }
}

fn split_unescaped(s: &str, delim: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                current.push('\\');
                current.push(next);
            }
        } else if c == delim {
            parts.push(current.clone());
            current.clear();
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

fn unescape(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
