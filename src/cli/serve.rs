use crate::api::{AppState, create_router};
use crate::core::config::AppConfig;
use crate::refresh::spawn_scheduled_refresh;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serves the HTTP API until interrupted.
pub async fn run(config: &AppConfig, state: AppState) -> Result<()> {
    let refresh_task = match config.refresh.interval_secs {
        Some(0) => {
            warn!("refresh.interval_secs is 0, scheduled refresh disabled");
            None
        }
        Some(secs) => Some(spawn_scheduled_refresh(
            state.clone(),
            Duration::from_secs(secs),
        )),
        None => None,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(task) = refresh_task {
        task.abort();
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
