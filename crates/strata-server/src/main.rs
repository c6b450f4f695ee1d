//! # Strata Server
//!
//! Main entry point: loads configuration, initializes logging and metrics,
//! connects MySQL and Redis, and serves the product API.

use strata_config::ConfigLoader;
use strata_core::telemetry::{init_telemetry, shutdown_telemetry};
use strata_core::StrataResult;
use strata_server::startup::{print_banner, print_startup_info};
use strata_server::AppBuilder;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("strata-server: {}", e);
        shutdown_telemetry();
        std::process::exit(1);
    }
}

async fn run() -> StrataResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_telemetry(&config.observability.telemetry(&config.app.name))?;
    print_banner();

    info!("Starting Strata Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let app = AppBuilder::new().with_config(config).build().await?;
    print_startup_info(app.config());

    app.run(shutdown_signal()).await?;

    shutdown_telemetry();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
