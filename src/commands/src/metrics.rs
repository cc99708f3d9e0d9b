//! `metrics` counters for the command plane (spec §7 observability).

pub fn record_enqueued(command_type: &str) {
    metrics::counter!("rackwatch_commands_enqueued_total", "command_type" => command_type.to_string()).increment(1);
}

pub fn record_result(status: &'static str) {
    metrics::counter!("rackwatch_command_results_total", "status" => status).increment(1);
}

pub fn record_expired(count: u64) {
    metrics::counter!("rackwatch_commands_expired_total").increment(count);
}
