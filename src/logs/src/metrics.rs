//! `metrics` counters for log ingestion (spec §7 observability).

pub fn record_entries_ingested(count: u64) {
    metrics::counter!("rackwatch_log_entries_ingested_total").increment(count);
}
