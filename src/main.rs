use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use cake_rest_api::{
    config::{Config, DatabaseConfig},
    middleware::init_tracing,
    router::create_router,
    service::{InMemoryCakeService, PostgresCakeService, SharedCakeService},
    ApiResult,
};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize structured logging
    if let Err(e) = init_tracing(&config.environment) {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }
    info!("Configuration loaded successfully");

    // Select the cake store
    let service: SharedCakeService = match config.database.clone() {
        Some(database) => match connect_postgres(database).await {
            Ok(service) => {
                info!("Using PostgreSQL cake store");
                Arc::new(service)
            }
            Err(e) => {
                error!("Failed to initialize PostgreSQL cake store: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            info!("No database configured, using in-memory cake store");
            Arc::new(InMemoryCakeService::new())
        }
    };

    let app = create_router(service, config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server with graceful shutdown handling
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

async fn connect_postgres(database: DatabaseConfig) -> ApiResult<PostgresCakeService> {
    let service = PostgresCakeService::connect(database).await?;
    info!("Database connection established");

    service.migrate().await?;
    Ok(service)
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
