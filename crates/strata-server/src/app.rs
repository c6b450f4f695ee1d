//! Application builder.

use crate::metrics::install_recorder;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use strata_config::AppConfig;
use strata_core::{HealthCheck, StrataError, StrataResult};
use strata_repository::{create_pool, DatabasePool, MySqlProductRepository, ProductRepository};
use strata_rest::{create_router, AppState};
use strata_service::{create_redis_store, RemoteStore, TieredProductService};
use tracing::{info, warn};

/// Builds the application from configuration.
///
/// By default the record store is MySQL and the remote tier is Redis when
/// `redis.enabled` is set. Either can be replaced before `build`.
pub struct AppBuilder {
    config: Option<AppConfig>,
    repository: Option<Arc<dyn ProductRepository>>,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self {
            config: None,
            repository: None,
            remote: None,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `repository` instead of connecting to MySQL.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn ProductRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Uses `remote` as the remote tier instead of Redis.
    #[must_use]
    pub fn with_remote_store(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Connects the dependencies and assembles the router.
    pub async fn build(self) -> StrataResult<Application> {
        let config = self.config.unwrap_or_default();
        let mut health_checks: Vec<Arc<dyn HealthCheck>> = Vec::new();

        let (repository, db_pool): (Arc<dyn ProductRepository>, Option<Arc<DatabasePool>>) =
            match self.repository {
                Some(repository) => (repository, None),
                None => {
                    let pool = create_pool(&config.database).await?;
                    if config.database.run_migrations {
                        pool.run_migrations().await?;
                    }
                    health_checks.push(pool.clone());
                    (Arc::new(MySqlProductRepository::new(pool.clone())), Some(pool))
                }
            };

        let remote: Option<Arc<dyn RemoteStore>> = match self.remote {
            Some(remote) => Some(remote),
            None if config.redis.enabled => {
                let store = create_redis_store(&config.redis)?;
                health_checks.push(store.clone());
                Some(store)
            }
            None => {
                info!("Redis disabled; running with the local tier only");
                None
            }
        };

        let service = TieredProductService::from_config(
            repository,
            &config.cache,
            remote,
            config.database.query_timeout(),
        );

        let mut state = AppState::new(Arc::new(service)).with_health_checks(health_checks);
        if config.observability.metrics_enabled {
            match install_recorder() {
                Ok(handle) => state = state.with_metrics(handle),
                Err(e) => warn!("Metrics disabled: {}", e),
            }
        }

        let router = create_router(state, &config.server, &config.observability);

        Ok(Application {
            config,
            router,
            db_pool,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built application, ready to serve.
pub struct Application {
    config: AppConfig,
    router: Router,
    db_pool: Option<Arc<DatabasePool>>,
}

impl Application {
    /// The effective configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves until `shutdown` completes, then closes the database pool.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> StrataResult<()> {
        let addr = self.config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| StrataError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        info!("Starting REST server on http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| StrataError::Internal(format!("REST server error: {}", e)))?;

        if let Some(pool) = self.db_pool {
            pool.close().await;
        }

        info!("Server shutdown complete");
        Ok(())
    }
}
