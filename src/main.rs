/// Space explorer backend: upstream space-data proxies plus rule-based analyzers
mod analysis;
mod clients;
mod config;
mod domain;
mod errors;
mod handlers;
mod imagery;
mod routes;
mod services;
mod utils;

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::imagery::{abort_pair, AbortHandle};
use crate::routes::build_router;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        port = config.port,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Configuration loaded successfully"
    );
    if config.nasa_api_key == "DEMO_KEY" {
        info!("NASA_API_KEY not set, using the rate-limited DEMO_KEY");
    }

    // Clients, services and shared state
    let (abort_handle, abort) = abort_pair();
    let state = AppState::from_config(&config, abort)?;

    // Build router
    let app = build_router(state, config.frontend_url.as_deref());

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("space_explorer listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(abort_handle))
        .await?;

    info!("server stopped");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM, then cancel in-flight image searches so
/// draining requests finish promptly.
async fn shutdown_signal(abort: AbortHandle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
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
    abort.abort();
}
