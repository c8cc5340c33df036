mod config;
mod routes;

pub use config::{ConfigError, ServerConfig, DEFAULT_PORT, PORT_ENV_VAR};

use std::sync::Arc;

use axum::Router;
use librate::RateCounter;
use routes::AppState;

/// Builds the application router around a shared rate counter.
pub fn app(counter: Arc<RateCounter>) -> Router {
    routes::router(AppState { counter })
}

/// Binds on all interfaces and serves until ctrl-c.
pub async fn serve(config: &ServerConfig, counter: Arc<RateCounter>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(counter))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
