use std::sync::Arc;

use tokio::signal;

use service_booking_api::config::AppConfig;
use service_booking_api::store::{DocumentStore, PgStore};
use service_booking_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ACCESS_TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "service_booking_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.server.port;

    let store: Arc<dyn DocumentStore> = match PgStore::connect(&config.database).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("failed to connect document store: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        config: Arc::new(config),
        store: store.clone(),
    };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Service booking API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    // Deterministic shutdown: release the pool before exiting
    store.close().await;
    tracing::info!("Server shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
