//! Memory App Backend Library
//!
//! Personal notes service: accounts, cookie-carried session tokens and
//! per-user memory records. The binary in `main.rs` only wires config,
//! tracing and the listener around [`build_router`].

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod memories;
pub mod middleware;

use crate::{
    auth::{CredentialHasher, TokenService},
    config::AppConfig,
    db::Database,
};
use anyhow::{Context, Result};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state handed to every handler; all parts are read-only after start-up
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<Database>,
    pub hasher: Arc<CredentialHasher>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let db = Database::open(&config.database_path, config.store_timeout)?;
        let hasher =
            CredentialHasher::new(config.bcrypt_cost).context("Failed to initialise password hasher")?;
        let tokens = TokenService::new(&config.secret_key, config.algorithm, config.access_token_ttl);

        info!(
            database = %db.path().display(),
            bcrypt_cost = hasher.cost(),
            token_ttl_secs = tokens.ttl().as_secs(),
            "application state ready"
        );

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            hasher: Arc::new(hasher),
            tokens: Arc::new(tokens),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/users/register", post(auth::api::register))
        .route("/users/login", post(auth::api::login))
        .route("/users/logout", get(auth::api::logout))
        .route("/users/me", get(auth::api::me))
        .route(
            "/memories",
            get(memories::api::list_memories).post(memories::api::create_memory),
        )
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 302 redirect, the browser-form flow used after register, login and logout
pub(crate) fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn index() -> &'static str {
    "Memory app: register at /users/register, log in at /users/login, keep notes at /memories"
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::to_bytes;
    use jsonwebtoken::Algorithm;
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use tempfile::TempDir;

    pub fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            secret_key: "test-secret".to_string(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::from_secs(30 * 60),
            database_path: dir.path().join("memory_app.db"),
            bcrypt_cost: 4,
            store_timeout: Duration::from_millis(2000),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }

    pub fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(test_config(&dir)).unwrap();
        (state, dir)
    }

    pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
