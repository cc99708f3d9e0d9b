//! Auth-scoped process metrics (spec §10.1 ambient stack).

pub fn record_registration_success() {
    metrics::counter!("rackwatch_registrations_total", "result" => "success").increment(1);
}

pub fn record_registration_failure(reason: &'static str) {
    metrics::counter!("rackwatch_registrations_total", "result" => "failure", "reason" => reason).increment(1);
}

pub fn record_auth_failure() {
    metrics::counter!("rackwatch_auth_failures_total").increment(1);
}
