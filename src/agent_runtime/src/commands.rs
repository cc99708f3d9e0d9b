//! Local execution of commands delivered via the polling path (spec
//! §4.6). Recognized types are simulated (this is a telemetry/control
//! plane exercise, not a BMC driver) but report a result shaped exactly
//! like a real implementation would; anything else fails with
//! `UnknownCommand`, matching spec §4.6 "Payloads not matching a
//! recognized schema ... will fail with `UnknownCommand` on execution".

use rackwatch_core::wire::{CommandPayload, CommandResultRequest, CommandResultStatus, FanControlPayload, PendingCommand};

use crate::metrics;

pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, pending: PendingCommand) -> CommandResultRequest {
        let command_type = pending.command.command_type().to_string();
        let outcome = match &pending.command {
            CommandPayload::FanControl(payload) => Ok(execute_fan_control(payload)),
            CommandPayload::IpmiRaw { command } => Ok(serde_json::json!({ "response": format!("ack:{command}") })),
            CommandPayload::SystemInfo { info_type } => Ok(execute_system_info(info_type)),
            CommandPayload::Reboot { delay_sec } => Ok(serde_json::json!({ "scheduled_in_sec": delay_sec })),
            CommandPayload::ConfigUpdate { values } => Ok(serde_json::json!({ "applied": values.len() })),
            CommandPayload::Other { command_type, .. } => Err(format!("UnknownCommand: {command_type}")),
        };

        match outcome {
            Ok(result) => {
                metrics::record_command_executed(&command_type, "completed");
                CommandResultRequest {
                    command_id: pending.command_id,
                    status: CommandResultStatus::Completed,
                    result: Some(result),
                    error: None,
                }
            }
            Err(error) => {
                metrics::record_command_executed(&command_type, "failed");
                CommandResultRequest {
                    command_id: pending.command_id,
                    status: CommandResultStatus::Failed,
                    result: None,
                    error: Some(error),
                }
            }
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn execute_fan_control(payload: &FanControlPayload) -> serde_json::Value {
    match payload {
        FanControlPayload::SetBmcMode { mode } => serde_json::json!({ "mode": mode }),
        FanControlPayload::SetFanSpeeds { zone0, zone1 } => serde_json::json!({ "zone0": zone0, "zone1": zone1 }),
        FanControlPayload::GetStatus => serde_json::json!({ "mode": "standard", "zone0": 40, "zone1": 40 }),
    }
}

fn execute_system_info(info_type: &str) -> serde_json::Value {
    match info_type {
        "hostname" => serde_json::json!({ "hostname": hostname_or_unknown() }),
        "kernel" => serde_json::json!({ "kernel": std::env::consts::OS }),
        "uptime" => serde_json::json!({ "uptime_sec": 0 }),
        other => serde_json::json!({ "unsupported": other }),
    }
}

fn hostname_or_unknown() -> String {
    hostname::get().ok().and_then(|s| s.into_string().ok()).unwrap_or_else(|| "unknown".to_string())
}

mod hostname {
    pub fn get() -> std::io::Result<std::ffi::OsString> {
        std::env::var_os("HOSTNAME").map(Ok).unwrap_or_else(|| {
            std::fs::read_to_string("/etc/hostname").map(|s| std::ffi::OsString::from(s.trim()))
        })
    }
}
