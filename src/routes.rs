//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: DB, cache, payment provider (public)
//! - `/api/*`            - REST API (see [`crate::api::routes`])
//! - `/uploads/*`        - Uploaded images
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - `FRONTEND_URL` with credentials, when configured
//! - **Rate limiting** - Per-IP token bucket, stricter for credential endpoints
//! - **Authentication** - Session token from Bearer header or cookie
//! - **Body limit** - Sized for a full set of hotel images
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{credential_routes, protected_routes, public_routes};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::Router;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// CORS policy for the browser client. Cookies require an explicit origin.
fn cors_layer(frontend_url: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
        .with_context(|| format!("FRONTEND_URL is not a valid origin: {frontend_url}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `upload_dir` - directory served under `/uploads`
/// - `frontend_url` - browser origin allowed to call the API with cookies
///
/// # Errors
///
/// Returns an error if `frontend_url` is not a valid header value.
pub fn app_router(
    state: AppState,
    upload_dir: &str,
    frontend_url: Option<&str>,
) -> Result<NormalizePath<Router>> {
    let api_router = Router::new()
        .merge(credential_routes().layer(rate_limit::secure_layer()))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(rate_limit::layer())
        .layer(DefaultBodyLimit::max(state.body_limit));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .layer(tracing::layer());

    if let Some(frontend_url) = frontend_url {
        router = router.layer(cors_layer(frontend_url)?);
    }

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
