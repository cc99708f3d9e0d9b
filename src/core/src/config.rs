//! Configuration loading (spec §6.4). YAML on disk, overlaid with
//! `RACKWATCH_*` environment variables, overlaid with CLI args that were
//! actually provided — an absent CLI flag must never clobber a config
//! value (spec §6.4 "CLI args override config values only when explicitly
//! provided").

use serde::{Deserialize, Serialize};

use config::{Config, Environment, File, FileFormat};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub auth_dir: String,
    pub db_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub metrics_retention_days: u32,
    pub logs_retention_days: u32,
    pub cleanup_interval_sec: u64,
    #[serde(default)]
    pub use_tls: bool,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub audit_log_path: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8443,
            auth_dir: "./auth".to_string(),
            db_path: "./rackwatch.db".to_string(),
            log_level: default_log_level(),
            metrics_retention_days: 30,
            logs_retention_days: 14,
            cleanup_interval_sec: 3600,
            use_tls: true,
            test_mode: false,
            audit_log_path: "./audit.log".to_string(),
        }
    }
}

/// CLI overrides for the server binary. Every field is optional: `None`
/// means "not provided on the command line", not "unset this value".
#[derive(Debug, Clone, Default)]
pub struct ServerConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub db_path: Option<String>,
    pub log_level: Option<String>,
    pub use_tls: Option<bool>,
    pub test_mode: Option<bool>,
}

impl ServerConfig {
    pub fn load(config_path: &str, overrides: ServerConfigOverrides) -> anyhow::Result<Self> {
        let built = Config::builder()
            .add_source(File::new(config_path, FileFormat::Yaml).required(false))
            .add_source(Environment::with_prefix("RACKWATCH").separator("__"))
            .build()?;

        let mut cfg: ServerConfig = built.try_deserialize().unwrap_or_else(|_| ServerConfig::default());

        if let Some(host) = overrides.host {
            cfg.host = host;
        }
        if let Some(port) = overrides.port {
            cfg.port = port;
        }
        if let Some(db_path) = overrides.db_path {
            cfg.db_path = db_path;
        }
        if let Some(log_level) = overrides.log_level {
            cfg.log_level = log_level;
        }
        if let Some(use_tls) = overrides.use_tls {
            cfg.use_tls = use_tls;
        }
        if let Some(test_mode) = overrides.test_mode {
            cfg.test_mode = test_mode;
        }

        Ok(cfg)
    }
}

/// Agent-side config (spec §6.1 "agent is in-scope only for enrollment and
/// shipping"). Loaded the same way, minus the server-only fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub server_url: String,
    pub agent_id: String,
    pub hostname: String,
    pub auth_dir: String,
    pub admin_token: String,
    #[serde(default = "default_collection_interval")]
    pub collection_interval_sec: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

fn default_collection_interval() -> u64 {
    30
}

#[derive(Debug, Clone, Default)]
pub struct AgentConfigOverrides {
    pub once: bool,
}

impl AgentConfig {
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        let built = Config::builder()
            .add_source(File::new(config_path, FileFormat::Yaml).required(true))
            .add_source(Environment::with_prefix("RACKWATCH").separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }
}
