use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Subsequent calls are no-ops.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a provider call by endpoint and outcome (`success` / `failure`).
pub fn record_generation(endpoint: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("relay_generations_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}

pub fn record_words_generated(count: usize) {
    counter!("relay_words_generated_total").increment(count as u64);
}
