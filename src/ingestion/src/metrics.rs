//! `metrics` counters for the ingestion pipeline (spec §7 observability).

pub fn record_batch_outcome(accepted: u32, rejected: u32, series_created: u32) {
    metrics::counter!("rackwatch_samples_accepted_total").increment(accepted as u64);
    metrics::counter!("rackwatch_samples_rejected_total").increment(rejected as u64);
    metrics::counter!("rackwatch_series_created_total").increment(series_created as u64);
}

pub fn record_rejection(reason: &'static str) {
    metrics::counter!("rackwatch_sample_rejections_total", "reason" => reason).increment(1);
}
