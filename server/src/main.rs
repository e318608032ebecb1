//! What to Eat server bootstrap: load settings, open the database pool,
//! mount routes, serve until shutdown.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use what2eat::{app_routes, connect_pool, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Settings come first: the log level default depends on `debug`, and an
    // invalid configuration must stop the process before it serves traffic.
    let settings = what2eat::load()?;

    let default_filter = if settings.debug {
        "what2eat=debug,info"
    } else {
        "what2eat=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if settings.jwt_secret_is_default() {
        tracing::warn!("JWT_SECRET is the built-in placeholder; override it before exposing this service");
    }

    let pool = connect_pool(&settings).await?;

    let state = AppState {
        settings: Arc::new(settings),
        pool: pool.clone(),
    };
    let app = app_routes(state.clone());

    let listener = TcpListener::bind("0.0.0.0:8000").await?;
    tracing::info!(
        "{} listening on {}",
        state.settings.app_name,
        listener.local_addr()?
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("database pool closed, bye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
