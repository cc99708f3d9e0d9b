//! Agent records: registration, lookup by bearer token, last-seen touch,
//! revocation (spec §4.1).

use crate::db::{map_row_not_found, Store};
use crate::types::{Agent, StorageResult};

impl Store {
    /// Returns the existing agent if `agent_id` is already registered.
    /// Registration idempotency (spec §4.1 "idempotent per agent_id only
    /// if identical public key") is enforced by the caller comparing the
    /// returned `public_key_pem`.
    pub async fn get_agent(&self, agent_id: &str) -> StorageResult<Option<Agent>> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            "SELECT agent_id, hostname, public_key_pem, bearer_token, registered_at, last_seen, revoked
             FROM agents WHERE agent_id = ?1",
            [agent_id],
            row_to_agent,
        );
        match result {
            Ok(agent) => Ok(Some(agent)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_agent_by_bearer_token(&self, bearer_token: &str) -> StorageResult<Option<Agent>> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            "SELECT agent_id, hostname, public_key_pem, bearer_token, registered_at, last_seen, revoked
             FROM agents WHERE bearer_token = ?1",
            [bearer_token],
            row_to_agent,
        );
        match result {
            Ok(agent) => Ok(Some(agent)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn insert_agent(&self, agent: &Agent) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO agents (agent_id, hostname, public_key_pem, bearer_token, registered_at, last_seen, revoked)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                agent.agent_id,
                agent.hostname,
                agent.public_key_pem,
                agent.bearer_token,
                agent.registered_at,
                agent.last_seen,
                agent.revoked,
            ],
        )?;
        Ok(())
    }

    pub async fn touch_last_seen(&self, agent_id: &str, now: i64) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        let updated = conn.execute(
            "UPDATE agents SET last_seen = ?1 WHERE agent_id = ?2 AND revoked = 0",
            rusqlite::params![now, agent_id],
        )?;
        if updated == 0 {
            return Err(map_row_not_found(rusqlite::Error::QueryReturnedNoRows, "agent"));
        }
        Ok(())
    }

    pub async fn revoke_agent(&self, agent_id: &str) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        let updated = conn.execute("UPDATE agents SET revoked = 1 WHERE agent_id = ?1", [agent_id])?;
        if updated == 0 {
            return Err(map_row_not_found(rusqlite::Error::QueryReturnedNoRows, "agent"));
        }
        Ok(())
    }

    pub async fn list_agents(&self) -> StorageResult<Vec<Agent>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT agent_id, hostname, public_key_pem, bearer_token, registered_at, last_seen, revoked
             FROM agents WHERE revoked = 0 ORDER BY registered_at ASC",
        )?;
        let rows = stmt.query_map([], row_to_agent)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub async fn count_agents(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT count(*) FROM agents WHERE revoked = 0", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_agent(row: &rusqlite::Row) -> rusqlite::Result<Agent> {
    Ok(Agent {
        agent_id: row.get(0)?,
        hostname: row.get(1)?,
        public_key_pem: row.get(2)?,
        bearer_token: row.get(3)?,
        registered_at: row.get(4)?,
        last_seen: row.get(5)?,
        revoked: row.get(6)?,
    })
}
