use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::settings::{MetricsConfig, SettingsConfig};
use crate::content::client::ContentClient;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::routes;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub content: Arc<ContentClient>,
}

impl AppState {
    pub fn new(metrics: &Metrics, content: Arc<ContentClient>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            content,
        }
    }
}

/// Content routes plus the metrics route when enabled.
pub fn app(state: AppState, metrics_config: &MetricsConfig) -> Router {
    Router::new()
        .merge(routes::router())
        .merge(state.metrics_state.router(metrics_config))
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM.
pub async fn start(settings_config: &SettingsConfig, content: Arc<ContentClient>) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, content);
    let app = app(state, &settings_config.metrics);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("listening on {}", listener.local_addr()?);

    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    metrics.up.set(0);
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {}", err);
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
    info!("shutdown signal received");
}
