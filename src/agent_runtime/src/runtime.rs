//! Orchestrates the agent process: register once, then loop collecting
//! metrics, shipping logs and executing commands every tick (spec §4.7,
//! agent side of §4.1/§4.2/§4.5/§4.6). `--once` (spec §6.1 agent CLI
//! flags) runs a single cycle and returns, which is what installers use
//! to validate connectivity before enabling the service.

use rackwatch_core::config::AgentConfig;
use rackwatch_core::wire::{LogBatch, MetricBatch};

use crate::collector::SystemCollector;
use crate::commands::CommandExecutor;
use crate::keystore::Keystore;
use crate::log_sources::{JournalSource, KernelRingBufferSource, LogSource, ProcKmsgReader, SyslogFileSource, SystemdJournalReader};
use crate::push_client::PushClient;
use crate::types::AgentRuntimeResult;

pub struct AgentRuntime {
    config: AgentConfig,
    keystore: Keystore,
    client: PushClient,
    collector: SystemCollector,
    executor: CommandExecutor,
    log_sources: Vec<Box<dyn LogSource>>,
}

impl AgentRuntime {
    pub fn new(config: AgentConfig) -> AgentRuntimeResult<Self> {
        let keystore = Keystore::load_or_create(&config.auth_dir)?;
        let client = PushClient::new(&config.server_url, config.insecure_skip_verify);

        let log_sources: Vec<Box<dyn LogSource>> = vec![
            Box::new(SyslogFileSource::new("/var/log/syslog", keystore.cursor_path("syslog"))),
            Box::new(KernelRingBufferSource::new(keystore.cursor_path("kernel"), Box::new(ProcKmsgReader))),
            Box::new(JournalSource::new(keystore.cursor_path("journal"), Box::new(SystemdJournalReader))),
        ];

        Ok(Self {
            config,
            keystore,
            client,
            collector: SystemCollector::new(),
            executor: CommandExecutor::new(),
            log_sources,
        })
    }

    /// Spec §4.1 steps 1-8: reuses a persisted bearer token if present,
    /// otherwise signs and submits a fresh registration.
    pub async fn ensure_registered(&self, now: i64) -> AgentRuntimeResult<String> {
        if let Some(token) = self.keystore.load_bearer_token() {
            return Ok(token);
        }

        let nonce = uuid::Uuid::new_v4().to_string();
        let response = self
            .client
            .register(&self.config.agent_id, &self.config.hostname, &self.config.admin_token, &nonce, now, &self.keystore)
            .await?;

        self.keystore.store_bearer_token(&response.bearer_token)?;
        Ok(response.bearer_token)
    }

    /// One full collection cycle: metrics, logs, then command poll/execute.
    /// Failures in one phase are logged and don't abort the others — a
    /// down log pipeline shouldn't stop metrics from flowing.
    pub async fn run_once(&mut self, now: i64) -> AgentRuntimeResult<()> {
        let bearer_token = self.ensure_registered(now).await?;

        if let Err(e) = self.ship_metrics(&bearer_token, now).await {
            tracing::warn!(error = %e, "metrics push failed this cycle");
        }

        self.ship_logs(&bearer_token).await;

        if let Err(e) = self.poll_and_execute_commands(&bearer_token).await {
            tracing::warn!(error = %e, "command poll failed this cycle");
        }

        Ok(())
    }

    async fn ship_metrics(&mut self, bearer_token: &str, now: i64) -> AgentRuntimeResult<()> {
        let samples = self.collector.collect(now);
        crate::metrics::record_samples_collected(samples.len() as u64);

        let batch = MetricBatch { agent_id: self.config.agent_id.clone(), batch_timestamp: now, samples };
        let result = self.client.push_metrics(bearer_token, &batch).await?;
        tracing::info!(accepted = result.accepted, rejected = result.rejected, "metrics pushed");
        Ok(())
    }

    async fn ship_logs(&mut self, bearer_token: &str) {
        for source in self.log_sources.iter_mut() {
            let source_kind = source.source();
            let entries = match source.poll() {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = %e, source = ?source_kind, "log source poll failed");
                    continue;
                }
            };
            if entries.is_empty() {
                continue;
            }

            let count = entries.len() as u64;
            let batch = LogBatch { agent_id: self.config.agent_id.clone(), entries };
            match self.client.push_logs(bearer_token, &batch).await {
                Ok(()) => crate::metrics::record_log_entries_shipped(source_label(source_kind), count),
                Err(e) => tracing::warn!(error = %e, source = ?source_kind, "log batch push failed, cursor unchanged for next retry"),
            }
        }
    }

    async fn poll_and_execute_commands(&mut self, bearer_token: &str) -> AgentRuntimeResult<()> {
        let pending = self.client.poll_commands(bearer_token, &self.config.agent_id).await?;
        for command in pending {
            let result = self.executor.execute(command);
            if let Err(e) = self.client.submit_result(bearer_token, &result).await {
                tracing::warn!(error = %e, command_id = %result.command_id, "failed to submit command result");
            }
        }
        Ok(())
    }

    /// Runs collection cycles on `collection_interval_sec` until ctrl-c.
    pub async fn run_forever(&mut self) -> AgentRuntimeResult<()> {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(self.config.collection_interval_sec));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = chrono::Utc::now().timestamp();
                    if let Err(e) = self.run_once(now).await {
                        tracing::error!(error = %e, "collection cycle failed");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received, exiting");
                    return Ok(());
                }
            }
        }
    }
}

fn source_label(source: rackwatch_core::wire::LogSourceDto) -> &'static str {
    use rackwatch_core::wire::LogSourceDto;
    match source {
        LogSourceDto::Kernel => "kernel",
        LogSourceDto::Journal => "journal",
        LogSourceDto::Syslog => "syslog",
        LogSourceDto::Application => "application",
    }
}
