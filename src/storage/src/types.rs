//! Domain types persisted by the storage layer (spec §3).

use rackwatch_core::labels::LabelSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub hostname: String,
    pub public_key_pem: String,
    pub bearer_token: String,
    pub registered_at: i64,
    pub last_seen: i64,
    pub revoked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Int,
    Float,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "int" => Some(ValueKind::Int),
            "float" => Some(ValueKind::Float),
            _ => None,
        }
    }
}

/// A single (metric_name, labels) identity — spec §3's "MetricSeries".
#[derive(Debug, Clone)]
pub struct MetricSeries {
    pub series_id: i64,
    pub agent_id: String,
    pub metric_name: String,
    pub labels: LabelSet,
    pub labels_hash: i64,
    pub value_kind: ValueKind,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricPoint {
    pub series_id: i64,
    pub timestamp_utc_sec: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    Kernel,
    Journal,
    Syslog,
    Application,
}

impl LogSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LogSource::Kernel => "kernel",
            LogSource::Journal => "journal",
            LogSource::Syslog => "syslog",
            LogSource::Application => "application",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kernel" => Some(LogSource::Kernel),
            "journal" => Some(LogSource::Journal),
            "syslog" => Some(LogSource::Syslog),
            "application" => Some(LogSource::Application),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub log_id: i64,
    pub agent_id: String,
    pub source: LogSource,
    pub timestamp_utc_sec: i64,
    pub severity: u8,
    pub message: String,
    pub unit: Option<String>,
    pub identifier: Option<String>,
    pub pid: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Pending,
    Delivered,
    Executing,
    Completed,
    Failed,
    Expired,
}

impl CommandStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Pending => "pending",
            CommandStatus::Delivered => "delivered",
            CommandStatus::Executing => "executing",
            CommandStatus::Completed => "completed",
            CommandStatus::Failed => "failed",
            CommandStatus::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CommandStatus::Pending),
            "delivered" => Some(CommandStatus::Delivered),
            "executing" => Some(CommandStatus::Executing),
            "completed" => Some(CommandStatus::Completed),
            "failed" => Some(CommandStatus::Failed),
            "expired" => Some(CommandStatus::Expired),
            _ => None,
        }
    }

    /// Only these transitions exist (spec §3 Commands invariants).
    pub fn can_transition_to(self, next: CommandStatus) -> bool {
        use CommandStatus::*;
        matches!(
            (self, next),
            (Pending, Delivered)
                | (Delivered, Executing)
                | (Delivered, Completed)
                | (Delivered, Failed)
                | (Executing, Completed)
                | (Executing, Failed)
                | (Pending, Expired)
                | (Delivered, Expired)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Command {
    pub command_id: String,
    pub agent_id: String,
    pub payload_json: String,
    pub status: CommandStatus,
    pub created_at: i64,
    pub ttl_sec: i64,
    pub result_json: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("kind mismatch for series {series_id}: expected {expected}, got {actual}")]
    KindMismatch { series_id: i64, expected: String, actual: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("pool error: {0}")]
    Pool(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
