//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`                  - Health check
//! - `POST /shorturls`               - Create a short link
//! - `GET  /shorturls/{code}/stats`  - Link statistics
//! - `GET  /{code}`                  - Short link redirect
//!
//! # Middleware
//!
//! - **Request log** - Telemetry entry per request, error entry on 5xx
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{request_log, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::shorturl_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_log::layer,
        ))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
