//! Server startup utilities.

use strata_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   _____ __             __
  / ___// /__________ _/ /_____ _
  \__ \/ __/ ___/ __ `/ __/ __ `/
 ___/ / /_/ /  / /_/ / /_/ /_/ /
/____/\__/_/   \__,_/\__/\__,_/

      tiered product cache
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let port = config.server.port;
    info!("{}", separator);
    info!("REST API:  http://{}/products", config.server.addr());
    info!("Health:    http://0.0.0.0:{}/health", port);
    if config.observability.metrics_enabled {
        info!("Metrics:   http://0.0.0.0:{}{}", port, config.observability.metrics_path);
    }
    if config.server.swagger_enabled {
        info!("API Docs:  http://0.0.0.0:{}/swagger-ui", port);
    }
    info!(
        "Tiers:     local{}",
        if config.redis.enabled { " -> remote (redis)" } else { "" }
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        print_startup_info(&config);

        config.redis.enabled = false;
        config.server.swagger_enabled = false;
        print_startup_info(&config);
    }
}
