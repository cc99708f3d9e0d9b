//! Logical schema (spec §3/§6.3). Created idempotently at startup —
//! `CREATE TABLE IF NOT EXISTS`, no migration framework, matching a
//! single-file embedded store with one schema version in flight.

use rusqlite::Connection;

use crate::types::StorageResult;

pub fn create_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS agents (
            agent_id        TEXT PRIMARY KEY,
            hostname        TEXT NOT NULL,
            public_key_pem  TEXT NOT NULL,
            bearer_token    TEXT NOT NULL UNIQUE,
            registered_at   INTEGER NOT NULL,
            last_seen       INTEGER NOT NULL,
            revoked         INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_agents_bearer_token ON agents(bearer_token);

        CREATE TABLE IF NOT EXISTS metric_series (
            series_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            agent_id     TEXT NOT NULL REFERENCES agents(agent_id),
            metric_name  TEXT NOT NULL,
            labels       TEXT NOT NULL,
            labels_hash  INTEGER NOT NULL,
            value_kind   TEXT NOT NULL,
            created_at   INTEGER NOT NULL,
            UNIQUE(agent_id, metric_name, labels_hash, labels)
        );
        CREATE INDEX IF NOT EXISTS idx_metric_series_agent_name ON metric_series(agent_id, metric_name);

        CREATE TABLE IF NOT EXISTS metric_points_int (
            series_id         INTEGER NOT NULL REFERENCES metric_series(series_id),
            timestamp_utc_sec INTEGER NOT NULL,
            value             INTEGER NOT NULL,
            PRIMARY KEY (series_id, timestamp_utc_sec)
        );

        CREATE TABLE IF NOT EXISTS metric_points_float (
            series_id         INTEGER NOT NULL REFERENCES metric_series(series_id),
            timestamp_utc_sec INTEGER NOT NULL,
            value             REAL NOT NULL,
            PRIMARY KEY (series_id, timestamp_utc_sec)
        );

        CREATE TABLE IF NOT EXISTS log_entries (
            log_id            INTEGER PRIMARY KEY AUTOINCREMENT,
            agent_id          TEXT NOT NULL REFERENCES agents(agent_id),
            source            TEXT NOT NULL,
            timestamp_utc_sec INTEGER NOT NULL,
            severity          INTEGER NOT NULL,
            message           TEXT NOT NULL,
            unit              TEXT,
            identifier        TEXT,
            pid               INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_log_entries_agent_time ON log_entries(agent_id, timestamp_utc_sec);
        CREATE INDEX IF NOT EXISTS idx_log_entries_time ON log_entries(timestamp_utc_sec);

        CREATE TABLE IF NOT EXISTS commands (
            command_id    TEXT PRIMARY KEY,
            agent_id      TEXT NOT NULL REFERENCES agents(agent_id),
            payload_json  TEXT NOT NULL,
            status        TEXT NOT NULL,
            created_at    INTEGER NOT NULL,
            ttl_sec       INTEGER NOT NULL,
            result_json   TEXT,
            error         TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_commands_agent_status ON commands(agent_id, status, created_at);

        CREATE TABLE IF NOT EXISTS retention_lease (
            id           INTEGER PRIMARY KEY CHECK (id = 1),
            holder       TEXT NOT NULL,
            expires_at   INTEGER NOT NULL
        );
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='metric_series'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
