//! Storage-scoped process metrics, emitted through the `metrics` facade
//! (spec §10.1 ambient stack) so they surface on the same `/metrics`
//! endpoint as everything else.

pub fn record_points_ingested(count: u64) {
    metrics::counter!("rackwatch_points_ingested_total").increment(count);
}

pub fn record_series_created() {
    metrics::counter!("rackwatch_series_created_total").increment(1);
}

pub fn record_retention_sweep(points_deleted: u64, logs_deleted: u64) {
    metrics::counter!("rackwatch_retention_points_deleted_total").increment(points_deleted);
    metrics::counter!("rackwatch_retention_logs_deleted_total").increment(logs_deleted);
}

pub fn record_commands_expired(count: u64) {
    metrics::counter!("rackwatch_commands_expired_total").increment(count);
}
