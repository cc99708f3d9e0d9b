//! Log ingestion (spec §4.5 "Server side"): append-only, no dedup. Every
//! submitted line is a distinct event even if it reads identical to one
//! already stored — the agent decides what counts as new via its cursor.

use rackwatch_core::wire::{LogBatch, LogEntryDto, LogSourceDto};
use rackwatch_storage::{LogEntry, LogSource, StorageHandle};

use crate::metrics;
use crate::types::{LogIngestionError, LogIngestionResult};

#[derive(Clone)]
pub struct LogIngestionService {
    store: StorageHandle,
}

impl LogIngestionService {
    pub fn new(store: StorageHandle) -> Self {
        Self { store }
    }

    pub async fn ingest_batch(
        &self,
        authenticated_agent_id: &str,
        batch: LogBatch,
    ) -> LogIngestionResult<u64> {
        if batch.agent_id != authenticated_agent_id {
            return Err(LogIngestionError::Forbidden);
        }

        let mut inserted = 0u64;
        for entry in &batch.entries {
            self.store.insert_log_entry(&to_storage_entry(authenticated_agent_id, entry)).await?;
            inserted += 1;
        }

        metrics::record_entries_ingested(inserted);
        Ok(inserted)
    }
}

fn to_storage_entry(agent_id: &str, dto: &LogEntryDto) -> LogEntry {
    LogEntry {
        log_id: 0,
        agent_id: agent_id.to_string(),
        source: map_source(dto.source),
        timestamp_utc_sec: dto.timestamp_utc_sec,
        severity: dto.severity,
        message: dto.message.clone(),
        unit: dto.unit.clone(),
        identifier: dto.identifier.clone(),
        pid: dto.pid,
    }
}

fn map_source(source: LogSourceDto) -> LogSource {
    match source {
        LogSourceDto::Kernel => LogSource::Kernel,
        LogSourceDto::Journal => LogSource::Journal,
        LogSourceDto::Syslog => LogSource::Syslog,
        LogSourceDto::Application => LogSource::Application,
    }
}
