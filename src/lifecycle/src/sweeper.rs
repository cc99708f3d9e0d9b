//! Combined retention + command-TTL sweep (spec §4.7).
//!
//! Both housekeeping jobs run off the one ticker so they never contend on
//! separate lock/lease cycles, and both skip entirely when the lease isn't
//! held — only one server instance performs the sweep at a time even if
//! several are pointed at the same datastore.

use std::time::Duration;

use rackwatch_storage::StorageHandle;
use tokio_util::sync::CancellationToken;

use crate::types::{LifecycleResult, SweepReport};

const LEASE_SECS: i64 = 300;

#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub metrics_retention_days: u32,
    pub logs_retention_days: u32,
}

#[derive(Clone)]
pub struct Sweeper {
    store: StorageHandle,
    policy: RetentionPolicy,
    holder_id: String,
}

impl Sweeper {
    pub fn new(store: StorageHandle, policy: RetentionPolicy, holder_id: impl Into<String>) -> Self {
        Self { store, policy, holder_id: holder_id.into() }
    }

    /// One sweep pass. Returns a zeroed report, not an error, when another
    /// holder has the lease — that's the expected steady state on every
    /// instance but the lease owner.
    pub async fn sweep_once(&self, now: i64) -> LifecycleResult<SweepReport> {
        if !self.store.try_acquire_retention_lease(&self.holder_id, now, LEASE_SECS).await? {
            return Ok(SweepReport::default());
        }

        let retention = self
            .store
            .sweep_retention(now, self.policy.metrics_retention_days, self.policy.logs_retention_days)
            .await?;
        let commands_expired = self.store.expire_stale_commands(now).await?;

        let report = SweepReport {
            points_deleted: retention.points_deleted,
            logs_deleted: retention.logs_deleted,
            commands_expired,
        };
        record_sweep(&report);
        Ok(report)
    }

    /// Runs `sweep_once` on `interval` until `shutdown` fires (spec §4.7
    /// startup/shutdown sequencing: this task is cancelled, not aborted,
    /// so a sweep in progress finishes before the loop exits).
    pub async fn run(&self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = chrono::Utc::now().timestamp();
                    match self.sweep_once(now).await {
                        Ok(report) if report.points_deleted > 0 || report.logs_deleted > 0 || report.commands_expired > 0 => {
                            tracing::info!(
                                points_deleted = report.points_deleted,
                                logs_deleted = report.logs_deleted,
                                commands_expired = report.commands_expired,
                                "retention sweep ran"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => tracing::error!(error = %e, "retention sweep failed"),
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("retention sweep stopping");
                    return;
                }
            }
        }
    }
}

fn record_sweep(report: &SweepReport) {
    metrics::counter!("rackwatch_retention_points_deleted_total").increment(report.points_deleted);
    metrics::counter!("rackwatch_retention_logs_deleted_total").increment(report.logs_deleted);
    metrics::counter!("rackwatch_commands_expired_total").increment(report.commands_expired);
}
