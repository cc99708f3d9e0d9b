//! Batch ingestion algorithm (spec §4.2).
//!
//! Each sample is reconciled against the series catalog independently —
//! one bad sample never fails the rest of the batch.

use rackwatch_core::labels::LabelSet;
use rackwatch_core::wire::{IngestResult, MetricBatch, RejectedSample, SampleDto, ValueKindHint};
use rackwatch_storage::{StorageHandle, ValueKind};
use validator::Validate;

use crate::metrics;
use crate::types::{IngestionError, IngestionResult};

#[derive(Clone)]
pub struct IngestionService {
    store: StorageHandle,
}

impl IngestionService {
    pub fn new(store: StorageHandle) -> Self {
        Self { store }
    }

    /// Runs the full §4.2 algorithm for one batch from an already-authenticated
    /// agent. `authenticated_agent_id` is the identity the bearer token
    /// resolved to; the batch's own `agent_id` field must agree with it.
    pub async fn ingest_batch(
        &self,
        authenticated_agent_id: &str,
        batch: MetricBatch,
        now: i64,
    ) -> IngestionResult<IngestResult> {
        batch.validate().map_err(|e| IngestionError::Malformed(e.to_string()))?;

        if batch.agent_id != authenticated_agent_id {
            return Err(IngestionError::Forbidden);
        }

        let mut accepted = 0u32;
        let mut rejected = 0u32;
        let mut series_created = 0u32;
        let mut rejections = Vec::new();

        for (index, sample) in batch.samples.into_iter().enumerate() {
            match self.ingest_sample(authenticated_agent_id, &sample, now).await {
                Ok(created) => {
                    accepted += 1;
                    if created {
                        series_created += 1;
                    }
                }
                Err(reason) => {
                    rejected += 1;
                    metrics::record_rejection(reason);
                    rejections.push(RejectedSample { index, reason: reason.to_string() });
                }
            }
        }

        self.store.touch_last_seen(authenticated_agent_id, now).await?;
        metrics::record_batch_outcome(accepted, rejected, series_created);

        Ok(IngestResult { accepted, rejected, series_created, rejections })
    }

    /// Returns `Ok(series_created)` on success, or `Err(reason)` for a
    /// per-sample rejection that should not abort the rest of the batch.
    async fn ingest_sample(
        &self,
        agent_id: &str,
        sample: &SampleDto,
        now: i64,
    ) -> Result<bool, &'static str> {
        let labels = LabelSet::from_pairs(sample.labels.clone());
        let effective_kind = infer_kind(sample);

        let (series, created) = self
            .store
            .find_or_create_series(agent_id, &sample.metric_name, &labels, effective_kind, now)
            .await
            .map_err(|_| "storage error resolving series")?;

        if series.value_kind != effective_kind {
            return Err("value_kind mismatch with established series");
        }

        self.store
            .insert_point(series.series_id, series.value_kind, sample.timestamp_utc_sec, sample.value)
            .await
            .map_err(|_| "storage error inserting point")?;

        Ok(created)
    }
}

/// Integer if the value has no fractional part and the hint (when present)
/// agrees; real otherwise (spec §4.2 step 2b).
fn infer_kind(sample: &SampleDto) -> ValueKind {
    match sample.value_kind_hint {
        Some(ValueKindHint::Int) => ValueKind::Int,
        Some(ValueKindHint::Float) => ValueKind::Float,
        None => {
            if sample.value.fract() == 0.0 {
                ValueKind::Int
            } else {
                ValueKind::Float
            }
        }
    }
}
