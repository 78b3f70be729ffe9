//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: backend wiring (account directory, resource stores, auth service)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = match &config.database_url {
        Some(url) => {
            let pool = clubhouse_infra::connect_postgres(url, config.database_max_connections)
                .await
                .context("failed to connect to postgres")?;
            tracing::info!("using postgres backends");
            AppServices::postgres(&config.token, pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory backends");
            AppServices::in_memory(&config.token)
        }
    };

    Ok(router(Arc::new(services)))
}

/// Router over already-built services.
pub fn router(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        auth: services.auth.clone(),
    };

    // Protected routes: require a bearer token resolving to a live principal.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state.clone(),
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::users::router(auth_state))
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_requests)))
}
