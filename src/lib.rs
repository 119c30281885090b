//! Church finance backend
//!
//! Layers, bottom up:
//! - `domain`: entities, ids and `DomainError`
//! - `repository`: the in-memory record store behind `Repository`
//! - `services`: approval progression, auth and reports
//! - `api`: axum handlers and the router
//!
//! All state is process-local and lost on restart.

pub mod api;
pub mod config;
pub mod domain;
pub mod repository;
pub mod services;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use api::build_router;
pub use config::AppConfig;
use repository::{seed_demo, RecordStore, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: RecordStore, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<(), String> {
    let store = RecordStore::new();
    if config.seed_demo {
        let hash = services::auth::hash_password(&config.auth_secret, DEMO_ADMIN_PASSWORD);
        seed_demo(&store, hash)
            .await
            .map_err(|e| format!("Failed to seed demo data: {}", e))?;
        log::info!("demo admin: {}", DEMO_ADMIN_EMAIL);
    }

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", config.bind_addr, e))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to read local address: {}", e))?;
    log::info!("listening on http://{}", addr);

    let app = build_router(AppState::new(store, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutdown requested");
}
