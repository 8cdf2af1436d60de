//! Top-level router configuration combining public and API routes.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`      - Short link redirect (public)
//! - `GET  /health`      - Health check: DB, click queue (public)
//! - `/api/*`            - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on `/api`
//! - **CORS** - Optional, single allowed origin
//! - **Path normalization** - Trailing slash handling

use std::time::Duration;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Deployment-dependent router settings.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// When `true`, rate limiting reads client IP from `X-Forwarded-For` /
    /// `X-Real-IP` headers instead of the peer socket address; enable only when the
    /// service runs behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// Browser origin allowed to call `/api`. CORS is disabled when `None`.
    pub allowed_origin: Option<HeaderValue>,
}

/// Builds the routes and middleware without path normalization.
///
/// Handlers relying on the peer address expect `ConnectInfo<SocketAddr>` in
/// request extensions.
pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let api_router = rate_limit::apply(api_router, rate_limit::SECURE, options.behind_proxy);
    let api_router = match options.allowed_origin.clone() {
        Some(origin) => api_router.layer(cors_layer(origin)),
        None => api_router,
    };

    let public_router = Router::new().route("/{slug}", get(redirect_handler));
    let public_router = rate_limit::apply(public_router, rate_limit::PUBLIC, options.behind_proxy);

    Router::new()
        .route("/health", get(health_handler))
        .merge(public_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `options` - proxy and CORS settings
pub fn app_router(state: AppState, options: &RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, options))
}

fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
