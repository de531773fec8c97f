use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use attendance_api::config::{Config, StoreBackend};
use attendance_api::database;
use attendance_api::services::{EventStore, MemoryEventStore, PgEventStore};
use attendance_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_api=debug,tower_http=debug".into())
        )
        .init();

    info!("Starting attendance API server...");

    let config = Config::from_env()?;
    info!(store = ?config.store_backend, daily_target = %config.daily_target, "Configuration loaded");

    let store: Arc<dyn EventStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_pool = database::new_pool(&config.database_url).await?;
            info!("Database connection pool created");
            let store = PgEventStore::new(db_pool);
            store.migrate().await?;
            info!("Database migrations applied");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("Using in-memory event store; check-ins are lost on restart");
            Arc::new(MemoryEventStore::new())
        }
    };

    let port = config.port;
    let app = attendance_api::router(AppState::new(store, config));

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Server stopped");
    Ok(())
}

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, shutting down gracefully...");
}
