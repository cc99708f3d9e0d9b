//! Wire-format DTOs shared between the agent and server binaries (spec
//! §6.2). All JSON; timestamps are UTC seconds unless the field name says
//! `_usec`/`_ms`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub agent_id: String,
    pub hostname: String,
    pub public_key: String,
    pub nonce: String,
    pub timestamp: i64,
    /// Base64-encoded PKCS#1 v1.5 signature over the canonical payload.
    pub signature: String,
    pub admin_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub agent_id: String,
    pub bearer_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub agent_id: String,
    pub hostname: String,
    pub last_seen: i64,
}

/// §4.2 input contract.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MetricBatch {
    #[validate(length(min = 1))]
    pub agent_id: String,
    pub batch_timestamp: i64,
    #[validate(length(min = 1), nested)]
    pub samples: Vec<SampleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SampleDto {
    #[validate(length(min = 1, max = 256))]
    pub metric_name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub value: f64,
    pub timestamp_utc_sec: i64,
    #[serde(default)]
    pub value_kind_hint: Option<ValueKindHint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKindHint {
    Int,
    Float,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResult {
    pub accepted: u32,
    pub rejected: u32,
    pub series_created: u32,
    pub rejections: Vec<RejectedSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedSample {
    pub index: usize,
    pub reason: String,
}

/// §4.5 log ingestion batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogBatch {
    pub agent_id: String,
    pub entries: Vec<LogEntryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryDto {
    pub source: LogSourceDto,
    pub timestamp_utc_sec: i64,
    pub severity: u8,
    pub message: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub pid: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSourceDto {
    Kernel,
    Journal,
    Syslog,
    Application,
}

/// §4.6 command plane payloads. New command types land in `Other` so the
/// server never has to reject an enqueue for a type it doesn't recognize
/// yet — only execution on the agent can fail with `UnknownCommand`. This
/// needs a hand-written `Serialize`/`Deserialize` pair: `#[serde(other)]`
/// only covers unit variants, and `Other` must carry the original payload.
#[derive(Debug, Clone)]
pub enum CommandPayload {
    FanControl(FanControlPayload),
    IpmiRaw { command: String },
    SystemInfo { info_type: String },
    Reboot { delay_sec: u32 },
    ConfigUpdate { values: BTreeMap<String, String> },
    Other { command_type: String, payload: serde_json::Value },
}

impl CommandPayload {
    pub fn command_type(&self) -> &str {
        match self {
            CommandPayload::FanControl(_) => "fan_control",
            CommandPayload::IpmiRaw { .. } => "ipmi_raw",
            CommandPayload::SystemInfo { .. } => "system_info",
            CommandPayload::Reboot { .. } => "reboot",
            CommandPayload::ConfigUpdate { .. } => "config_update",
            CommandPayload::Other { command_type, .. } => command_type,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawCommand {
    #[serde(rename = "type")]
    command_type: String,
    payload: serde_json::Value,
}

impl Serialize for CommandPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (command_type, payload) = match self {
            CommandPayload::FanControl(inner) => {
                ("fan_control".to_string(), serde_json::to_value(inner))
            }
            CommandPayload::IpmiRaw { command } => {
                ("ipmi_raw".to_string(), serde_json::to_value(serde_json::json!({ "command": command })))
            }
            CommandPayload::SystemInfo { info_type } => {
                ("system_info".to_string(), serde_json::to_value(serde_json::json!({ "type": info_type })))
            }
            CommandPayload::Reboot { delay_sec } => {
                ("reboot".to_string(), serde_json::to_value(serde_json::json!({ "delay_sec": delay_sec })))
            }
            CommandPayload::ConfigUpdate { values } => {
                ("config_update".to_string(), serde_json::to_value(values))
            }
            CommandPayload::Other { command_type, payload } => {
                (command_type.clone(), Ok(payload.clone()))
            }
        };
        let payload = payload.map_err(serde::ser::Error::custom)?;
        RawCommand { command_type, payload }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CommandPayload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCommand::deserialize(deserializer)?;
        let parsed = match raw.command_type.as_str() {
            "fan_control" => serde_json::from_value(raw.payload.clone()).ok().map(CommandPayload::FanControl),
            "ipmi_raw" => serde_json::from_value(raw.payload.clone()).ok().map(|v: IpmiRawFields| {
                CommandPayload::IpmiRaw { command: v.command }
            }),
            "system_info" => serde_json::from_value(raw.payload.clone()).ok().map(|v: SystemInfoFields| {
                CommandPayload::SystemInfo { info_type: v.info_type }
            }),
            "reboot" => serde_json::from_value(raw.payload.clone()).ok().map(|v: RebootFields| {
                CommandPayload::Reboot { delay_sec: v.delay_sec }
            }),
            "config_update" => serde_json::from_value(raw.payload.clone()).ok().map(CommandPayload::ConfigUpdate),
            _ => None,
        };
        Ok(parsed.unwrap_or(CommandPayload::Other { command_type: raw.command_type, payload: raw.payload }))
    }
}

#[derive(Deserialize)]
struct IpmiRawFields {
    command: String,
}

#[derive(Deserialize)]
struct SystemInfoFields {
    #[serde(rename = "type")]
    info_type: String,
}

#[derive(Deserialize)]
struct RebootFields {
    delay_sec: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FanControlPayload {
    SetBmcMode { mode: BmcMode },
    SetFanSpeeds { zone0: u8, zone1: u8 },
    GetStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmcMode {
    Standard,
    Full,
    Optimal,
    HeavyIo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueCommandRequest {
    pub agent_id: String,
    pub command: CommandPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueCommandResponse {
    pub command_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCommand {
    pub command_id: String,
    pub command: CommandPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResultRequest {
    pub command_id: String,
    pub status: CommandResultStatus,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResultStatus {
    Completed,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_command_payload_round_trips_as_other() {
        let json = r#"{"type": "turbo_encabulate", "payload": {"foo": "bar"}}"#;
        let parsed: CommandPayload = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, CommandPayload::Other { .. }));
        assert_eq!(parsed.command_type(), "turbo_encabulate");
    }

    #[test]
    fn fan_control_payload_round_trips() {
        let payload = CommandPayload::FanControl(FanControlPayload::SetFanSpeeds { zone0: 60, zone1: 80 });
        let json = serde_json::to_string(&payload).unwrap();
        let back: CommandPayload = serde_json::from_str(&json).unwrap();
        match back {
            CommandPayload::FanControl(FanControlPayload::SetFanSpeeds { zone0, zone1 }) => {
                assert_eq!((zone0, zone1), (60, 80));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
