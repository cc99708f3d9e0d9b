//! Append-only, JSON-lines audit log.
//!
//! Every authentication attempt, admin action, and API access is recorded
//! here. The log is never read by the running process — it exists for
//! operators to `tail`/`grep` after the fact (spec §4.1, §7).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub timestamp: u64,
    pub event_type: String,
    pub agent_id: Option<String>,
    pub resource: String,
    pub action: String,
    pub result: String,
    pub remote_addr: Option<String>,
    pub metadata: HashMap<String, String>,
    pub severity: AuditSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Append-only sink. Cheap to clone: the file handle is shared behind a mutex.
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<Mutex<BufWriter<File>>>,
}

impl AuditLogger {
    pub fn new(log_path: &str) -> std::io::Result<Self> {
        if let Some(parent) = Path::new(log_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(log_path)?;

        Ok(Self {
            sink: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    pub fn log_event(&self, mut event: AuditEvent) -> std::io::Result<()> {
        if event.timestamp == 0 {
            event.timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
        }
        if event.id.is_empty() {
            event.id = Uuid::new_v4().to_string();
        }

        let line = serde_json::to_string(&event)?;
        let mut writer = self.sink.lock().expect("audit log mutex poisoned");
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        if matches!(event.severity, AuditSeverity::Critical | AuditSeverity::High) {
            tracing::warn!(
                event_type = %event.event_type,
                action = %event.action,
                result = %event.result,
                "audited high-severity event"
            );
        }

        Ok(())
    }

    /// Spec §4.1: authentication failures are keyed by the first 8 chars of
    /// the presented token, never the full token.
    pub fn log_authentication(
        &self,
        agent_id: Option<&str>,
        token_prefix: &str,
        success: bool,
        remote_addr: Option<String>,
    ) -> std::io::Result<()> {
        let mut metadata = HashMap::new();
        metadata.insert("token_prefix".to_string(), token_prefix.to_string());

        self.log_event(AuditEvent {
            id: String::new(),
            timestamp: 0,
            event_type: "authentication".to_string(),
            agent_id: agent_id.map(str::to_string),
            resource: "bearer_token".to_string(),
            action: if success { "authenticate" } else { "authenticate_failed" }.to_string(),
            result: if success { "success" } else { "failure" }.to_string(),
            remote_addr,
            metadata,
            severity: if success { AuditSeverity::Low } else { AuditSeverity::Medium },
        })
    }

    pub fn log_api_access(
        &self,
        agent_id: Option<String>,
        endpoint: &str,
        method: &str,
        status_code: u16,
        remote_addr: Option<String>,
    ) -> std::io::Result<()> {
        let mut metadata = HashMap::new();
        metadata.insert("status_code".to_string(), status_code.to_string());
        metadata.insert("http_method".to_string(), method.to_string());

        self.log_event(AuditEvent {
            id: String::new(),
            timestamp: 0,
            event_type: "api_access".to_string(),
            agent_id,
            resource: endpoint.to_string(),
            action: method.to_string(),
            result: status_code.to_string(),
            remote_addr,
            metadata,
            severity: match status_code {
                200..=299 => AuditSeverity::Low,
                400..=499 => AuditSeverity::Medium,
                _ => AuditSeverity::High,
            },
        })
    }

    pub fn log_admin_action(
        &self,
        action: &str,
        target: &str,
        remote_addr: Option<String>,
    ) -> std::io::Result<()> {
        self.log_event(AuditEvent {
            id: String::new(),
            timestamp: 0,
            event_type: "admin_action".to_string(),
            agent_id: None,
            resource: target.to_string(),
            action: action.to_string(),
            result: "success".to_string(),
            remote_addr,
            metadata: HashMap::new(),
            severity: AuditSeverity::High,
        })
    }
}
