//! Todo Server
//!
//! Per-user todo lists behind token authentication. Users register or log in
//! to obtain a bearer token; every todo endpoint resolves the caller from that
//! token and only ever touches the caller's own todos.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use auth::{JwtConfig, JwtManager, PasswordHasher};
use axum::Router;
use todo_store::Store;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::state::{create_shared_state, SharedState};

/// Creates the application router with all routes configured.
pub fn create_app<S: Store + 'static>(state: SharedState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
pub fn create_state<S: Store>(config: Config, store: S) -> anyhow::Result<SharedState<S>> {
    let jwt_config =
        JwtConfig::new(&config.jwt_secret).with_expiration_days(config.jwt_expiration_days);
    let jwt_manager = JwtManager::new(jwt_config);
    let password_hasher = PasswordHasher::new(config.bcrypt_cost)?;

    Ok(create_shared_state(config, store, jwt_manager, password_hasher))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
