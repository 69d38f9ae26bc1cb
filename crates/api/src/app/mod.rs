//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: store selection (seeded in-memory vs postgres)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and query-string mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware::{self, AuthState};
use crate::token::Hs256TokenVerifier;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services().await?);
    Ok(router_with(services, jwt_secret))
}

/// Assemble the router around explicit services (tests inject their own).
pub fn router_with(services: Arc<services::AppServices>, jwt_secret: String) -> Router {
    let verifier = Arc::new(Hs256TokenVerifier::new(jwt_secret.as_bytes()));
    let auth_state = AuthState { verifier };

    // Protected routes: require a verified bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
