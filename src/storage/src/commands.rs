//! Command persistence and state-machine transitions (spec §3, §4.6).
//! Transitions are conditional `UPDATE ... WHERE status IN (...)` so two
//! concurrent callers racing the same command never both succeed — never
//! an in-process mutex guarding cross-request state.

use crate::db::{map_row_not_found, Store};
use crate::types::{Command, CommandStatus, StorageError, StorageResult};

impl Store {
    pub async fn insert_command(&self, command: &Command) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO commands (command_id, agent_id, payload_json, status, created_at, ttl_sec, result_json, error)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                command.command_id,
                command.agent_id,
                command.payload_json,
                command.status.as_str(),
                command.created_at,
                command.ttl_sec,
                command.result_json,
                command.error,
            ],
        )?;
        Ok(())
    }

    pub async fn get_command(&self, command_id: &str) -> StorageResult<Command> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT command_id, agent_id, payload_json, status, created_at, ttl_sec, result_json, error
             FROM commands WHERE command_id = ?1",
            [command_id],
            row_to_command,
        )
        .map_err(|e| map_row_not_found(e, "command"))
    }

    /// FIFO-ordered pending commands for an agent's long-poll (spec §4.6).
    /// Also flips each returned command to `delivered` in the same
    /// transaction, since a successful fetch is itself the delivery event.
    pub async fn fetch_and_deliver_pending(&self, agent_id: &str, now: i64, limit: u32) -> StorageResult<Vec<Command>> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let ids: Vec<String> = {
            let mut stmt = tx.prepare(
                "SELECT command_id FROM commands
                 WHERE agent_id = ?1 AND status = 'pending'
                 ORDER BY created_at ASC LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![agent_id, limit], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        for id in &ids {
            tx.execute(
                "UPDATE commands SET status = 'delivered' WHERE command_id = ?1 AND status = 'pending'",
                [id],
            )?;
        }

        let mut delivered = Vec::with_capacity(ids.len());
        for id in &ids {
            delivered.push(tx.query_row(
                "SELECT command_id, agent_id, payload_json, status, created_at, ttl_sec, result_json, error
                 FROM commands WHERE command_id = ?1",
                [id],
                row_to_command,
            )?);
        }

        tx.commit()?;
        let _ = now;
        Ok(delivered)
    }

    /// Conditional transition: only succeeds if the current status allows
    /// it (spec §3 transition table). Returns `InvalidTransition` on a
    /// stale or already-terminal command instead of silently no-op'ing.
    pub async fn transition_command(
        &self,
        command_id: &str,
        next: CommandStatus,
        result_json: Option<String>,
        error: Option<String>,
    ) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        let current_str: String = conn
            .query_row("SELECT status FROM commands WHERE command_id = ?1", [command_id], |r| r.get(0))
            .map_err(|e| map_row_not_found(e, "command"))?;
        let current = CommandStatus::from_str(&current_str).unwrap_or(CommandStatus::Pending);

        if !current.can_transition_to(next) {
            return Err(StorageError::InvalidTransition {
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let updated = conn.execute(
            "UPDATE commands SET status = ?1, result_json = ?2, error = ?3
             WHERE command_id = ?4 AND status = ?5",
            rusqlite::params![next.as_str(), result_json, error, command_id, current.as_str()],
        )?;

        if updated == 0 {
            return Err(StorageError::Conflict(format!(
                "command {command_id} changed status concurrently"
            )));
        }
        Ok(())
    }

    pub async fn count_commands(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT count(*) FROM commands", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_command(row: &rusqlite::Row) -> rusqlite::Result<Command> {
    let status_str: String = row.get(3)?;
    Ok(Command {
        command_id: row.get(0)?,
        agent_id: row.get(1)?,
        payload_json: row.get(2)?,
        status: CommandStatus::from_str(&status_str).unwrap_or(CommandStatus::Pending),
        created_at: row.get(4)?,
        ttl_sec: row.get(5)?,
        result_json: row.get(6)?,
        error: row.get(7)?,
    })
}
