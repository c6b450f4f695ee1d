//! Prometheus recorder installation.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use strata_core::{StrataError, StrataResult};
use strata_service::describe_metrics;
use tracing::info;

/// Installs the global Prometheus recorder and registers metric
/// descriptions.
///
/// The recorder is pull-based; the returned handle renders `/metrics`.
/// Installing twice in one process fails.
pub fn install_recorder() -> StrataResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| StrataError::Configuration(format!("Failed to install Prometheus recorder: {}", e)))?;

    describe_metrics();
    info!("Prometheus metrics initialized");
    Ok(handle)
}
