//! Prop firm directory - Rust backend
//!
//! In-memory directory of prop trading firms, trader reviews and
//! educational resources, served over a JSON API.

mod api;
mod auth;
mod catalog;
mod config;
mod error;
mod pricing;
mod rating;
mod store;
mod types;
mod validation;

use crate::api::create_router;
use crate::auth::CredentialHasher;
use crate::config::AppConfig;
use crate::store::Store;

use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Application state shared across all handlers
pub struct AppState {
    pub store: Store,
}

impl AppState {
    /// Build the store, register the admin account and optionally seed it
    pub fn from_config(config: &AppConfig) -> Result<Self, store::StoreError> {
        let hasher = match &config.auth_secret {
            Some(secret) => CredentialHasher::new(secret.as_bytes()),
            None => CredentialHasher::random(),
        };
        let store = Store::new(hasher);
        store.add_admin(&config.admin_username, &config.admin_password)?;
        if config.seed_sample_data {
            store.seed_sample_data();
        }
        Ok(Self { store })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Prop firm directory backend v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    let state = Arc::new(AppState::from_config(&config)?);

    // Create router with all API endpoints
    let app = create_router(state);

    // Start server
    let addr = config.socket_addr();
    info!("Starting API server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
