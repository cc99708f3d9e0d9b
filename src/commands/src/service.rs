//! Command plane (spec §4.6): enqueue, FIFO polling delivery, and result
//! capture. Recognized-schema validation happens at execution time on the
//! agent, not here — the server accepts any payload shape at enqueue.

use rackwatch_core::wire::{CommandPayload, CommandResultRequest, CommandResultStatus, PendingCommand};
use rackwatch_storage::{Command, CommandStatus, StorageHandle};

use crate::metrics;
use crate::types::{CommandError, CommandResult};

const POLL_BATCH_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct CommandService {
    store: StorageHandle,
}

impl CommandService {
    pub fn new(store: StorageHandle) -> Self {
        Self { store }
    }

    pub async fn enqueue(&self, agent_id: &str, payload: CommandPayload, now: i64) -> CommandResult<String> {
        let command_id = uuid::Uuid::new_v4().to_string();
        let command_type = payload.command_type().to_string();
        let payload_json = serde_json::to_string(&payload).map_err(|e| CommandError::Malformed(e.to_string()))?;
        let ttl_sec = default_ttl_sec(&payload);

        self.store
            .insert_command(&Command {
                command_id: command_id.clone(),
                agent_id: agent_id.to_string(),
                payload_json,
                status: CommandStatus::Pending,
                created_at: now,
                ttl_sec,
                result_json: None,
                error: None,
            })
            .await?;

        metrics::record_enqueued(&command_type);
        Ok(command_id)
    }

    /// Atomically returns and marks `delivered` every pending command
    /// addressed to `agent_id`, FIFO by `created_at`.
    pub async fn poll_pending(&self, agent_id: &str, now: i64) -> CommandResult<Vec<PendingCommand>> {
        let delivered = self.store.fetch_and_deliver_pending(agent_id, now, POLL_BATCH_LIMIT).await?;
        delivered
            .into_iter()
            .map(|command| {
                let payload: CommandPayload = serde_json::from_str(&command.payload_json)
                    .map_err(|e| CommandError::Malformed(e.to_string()))?;
                Ok(PendingCommand { command_id: command.command_id, command: payload })
            })
            .collect()
    }

    pub async fn submit_result(&self, agent_id: &str, result: CommandResultRequest) -> CommandResult<()> {
        let command = self.store.get_command(&result.command_id).await?;
        if command.agent_id != agent_id {
            return Err(CommandError::Forbidden);
        }

        let next = match result.status {
            CommandResultStatus::Completed => CommandStatus::Completed,
            CommandResultStatus::Failed => CommandStatus::Failed,
        };
        let result_json = result.result.map(|v| v.to_string());

        self.store.transition_command(&result.command_id, next, result_json, result.error).await?;
        metrics::record_result(match next {
            CommandStatus::Completed => "completed",
            _ => "failed",
        });
        Ok(())
    }

    pub async fn sweep_expired(&self, now: i64) -> CommandResult<u64> {
        let count = self.store.expire_stale_commands(now).await?;
        metrics::record_expired(count);
        Ok(count)
    }
}

/// Per command-type TTL (spec §4.6: minimum 60s; reboot gets extra headroom
/// since a BMC reset can take longer to acknowledge).
fn default_ttl_sec(payload: &CommandPayload) -> i64 {
    match payload {
        CommandPayload::Reboot { .. } => 180,
        CommandPayload::ConfigUpdate { .. } => 120,
        CommandPayload::IpmiRaw { .. } => 90,
        CommandPayload::FanControl(_) | CommandPayload::SystemInfo { .. } => 60,
        CommandPayload::Other { .. } => 300,
    }
}
