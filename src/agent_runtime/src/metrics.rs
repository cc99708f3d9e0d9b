//! `metrics` counters for the agent runtime (spec §7 observability).

pub fn record_push_attempt(endpoint: &'static str, outcome: &'static str) {
    metrics::counter!("rackwatch_agent_push_attempts_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}

pub fn record_samples_collected(count: u64) {
    metrics::counter!("rackwatch_agent_samples_collected_total").increment(count);
}

pub fn record_log_entries_shipped(source: &'static str, count: u64) {
    metrics::counter!("rackwatch_agent_log_entries_shipped_total", "source" => source).increment(count);
}

pub fn record_command_executed(command_type: &str, outcome: &'static str) {
    metrics::counter!("rackwatch_agent_commands_executed_total", "command_type" => command_type.to_string(), "outcome" => outcome)
        .increment(1);
}
