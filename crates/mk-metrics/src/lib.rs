use std::env;
use std::sync::OnceLock;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize a Prometheus exporter listening on `0.0.0.0:<port>`.
///
/// The port is resolved from the provided environment variable name or the
/// supplied `default_port`. Returns a handle to the exporter if it was started.
pub fn init_metrics(port_env: &str, default_port: u16) -> Option<&'static PrometheusHandle> {
    let port = env::var(port_env)
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(default_port);

    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install_recorder()
    {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            info!(metrics_port = port, "started prometheus exporter");
            PROMETHEUS_HANDLE.get()
        }
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to start prometheus exporter");
            PROMETHEUS_HANDLE.get()
        }
    }
}

/// Count one matching call: live candidates scored and results returned.
pub fn record_match_run(live_candidates: usize, returned: usize) {
    counter!("mk_match_runs_total").increment(1);
    counter!("mk_match_candidates_scored_total").increment(live_candidates as u64);
    counter!("mk_match_results_returned_total").increment(returned as u64);
}

pub fn record_recommendations(algorithm: &str, returned: usize) {
    counter!("mk_recommendation_runs_total", "algorithm" => algorithm.to_string()).increment(1);
    counter!("mk_recommendations_returned_total", "algorithm" => algorithm.to_string())
        .increment(returned as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_noops_without_recorder() {
        record_match_run(5, 3);
        record_recommendations("hybrid", 10);
    }
}
