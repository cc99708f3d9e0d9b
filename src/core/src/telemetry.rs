//! Ambient stack: structured logging and process metrics (spec §10.1).
//!
//! Tracing is initialized once at binary startup; the Prometheus recorder
//! backs the `/metrics` endpoint (spec §6.1 health/stats surface).

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(true)
        .init();
}

/// Installs the global Prometheus recorder and returns a handle whose
/// `render()` produces the exposition-format text body for `/metrics`.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
