// Framework bootstrap for the API server runtime.

use crate::frameworks::config::{AppConfig, AppEnvironment};
use crate::interface_adapters::modules::ApiModule;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{ErrorBoundary, SystemClock};
use crate::interface_adapters::system;

use axum::Router;
use std::net::SocketAddr;

// Startup failures; all of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Root composition of the API modules served by the binary.
pub fn root_modules() -> Vec<ApiModule> {
    vec![system::module()]
}

pub fn build_app(config: &AppConfig, modules: Vec<ApiModule>) -> Router {
    match (&config.environment, &config.docs_credentials) {
        (AppEnvironment::Dev, Some(_)) => {
            tracing::info!("api documentation requires basic auth (APP_ENV=dev)");
        }
        (environment, _) => {
            tracing::warn!(
                ?environment,
                "api documentation is served without authentication; the login gate only applies to APP_ENV=dev"
            );
        }
    }

    routes::app(
        modules,
        config.docs_credentials.clone(),
        ErrorBoundary::new(SystemClock::new()),
    )
}

pub async fn run(
    listener: tokio::net::TcpListener,
    config: &AppConfig,
    modules: Vec<ApiModule>,
) -> Result<(), StartupError> {
    let address = listener.local_addr()?;
    let app = build_app(config, modules);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        })?;

    tracing::info!("server shutdown complete");
    Ok(())
}

pub async fn run_with_config() -> Result<(), StartupError> {
    init_runtime();

    let config = AppConfig::from_env();
    let address = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            addr: address,
            source,
        })?;

    run(listener, &config, root_modules()).await
}

// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, starting shutdown");
        }
    }
}
