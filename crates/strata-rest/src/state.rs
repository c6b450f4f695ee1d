//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use strata_core::HealthCheck;
use strata_service::ProductService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<dyn ProductService>,
    /// Dependencies probed by `/ready`.
    pub health_checks: Arc<Vec<Arc<dyn HealthCheck>>>,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state with no health checks or metrics.
    pub fn new(product_service: Arc<dyn ProductService>) -> Self {
        Self {
            product_service,
            health_checks: Arc::new(Vec::new()),
            metrics: None,
        }
    }

    /// Sets the dependencies probed by the readiness endpoint.
    #[must_use]
    pub fn with_health_checks(mut self, checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        self.health_checks = Arc::new(checks);
        self
    }

    /// Sets the handle rendering `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
