//! Rackwatch — self-hosted datacenter telemetry and remote-control plane.
//!
//! This crate holds the pieces every workspace member shares: the error
//! taxonomy, wire DTOs, label-set canonicalization, config loading, audit
//! logging, rate limiting, and telemetry bootstrap. Domain logic (storage,
//! auth, ingestion, query, logs, commands, agent runtime, lifecycle) lives
//! in its own workspace crate.

pub mod audit_logging;
pub mod config;
pub mod error;
pub mod labels;
pub mod rate_limiting;
pub mod telemetry;
pub mod utils;
pub mod wire;

pub use audit_logging::{AuditEvent, AuditLogger, AuditSeverity};
pub use config::{AgentConfig, ServerConfig};
pub use error::{ApiError, ErrorKind};
pub use labels::{LabelFilter, LabelSet};
pub use rate_limiting::{RateLimitConfig, RateLimiter};
