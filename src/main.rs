use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cluster_inventory::{create_router, AppState, Config, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {:#}", e);
            return Err(e.into());
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("🚀 Starting cluster inventory backend...");

    let store = match Store::connect(&config.database_url, config.database_max_connections).await {
        Ok(store) => {
            info!("✅ Connected to {}", config.database_url);
            store
        }
        Err(e) => {
            error!("❌ Failed to open store: {:#}", e);
            return Err(e.into());
        }
    };

    let app = create_router(AppState::new(config.clone(), store));

    let listener = match tokio::net::TcpListener::bind(&config.server_address).await {
        Ok(listener) => {
            info!("🌐 Server listening on {}", config.server_address);
            listener
        }
        Err(e) => {
            error!("❌ Failed to bind to {}: {}", config.server_address, e);
            return Err(e.into());
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("✅ Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
