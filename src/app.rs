use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::settings::AppConfig;
use crate::infrastructure::queue::{JobQueue, RabbitMqQueue};
use crate::infrastructure::storage::S3Storage;
use crate::modules::jobs::repository::JobRepository;
use crate::state::AppState;

pub async fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    info!(
        port = config.server_port,
        storage = %config.storage_endpoint,
        queue = %config.queue_name,
        "Starting API server"
    );

    let storage = S3Storage::connect(
        &config.storage_url(),
        &config.storage_access_key,
        &config.storage_secret_key,
        &config.storage_bucket,
    )
    .await?;

    let queue: Arc<dyn JobQueue> =
        Arc::new(RabbitMqQueue::connect(&config.queue_url, &config.queue_name).await?);

    let state = AppState::new(
        config.clone(),
        JobRepository::new(),
        Arc::new(storage),
        queue.clone(),
    );

    let app = create_app(state).await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.server_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing queue connection");
    queue.close().await?;

    Ok(())
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
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
