//! # wm-api — HTTP Service for the Evidence Stack
//!
//! Axum service exposing evidence blob resolution, the blob storage
//! gateway, stable-asset balances, fail-closed entitlement checks and bet
//! validation.
//!
//! ## Middleware Stack
//!
//! Requests to `/v1/*` and `/openapi.json` pass through:
//! 1. `TraceLayer` request/response tracing.
//! 2. Bearer token authentication, when `AUTH_TOKEN` is set.
//!
//! Health probes at `/health/liveness` and `/health/readiness` are mounted
//! outside the middleware stack so orchestrators can reach them without a
//! token.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::policy::router())
        .merge(routes::blobs::router())
        .merge(routes::balance::router())
        .merge(routes::entitlement::router())
        .merge(routes::bets::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
