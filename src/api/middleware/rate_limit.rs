//! Per-IP rate limiting using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn bucket(per_second: u64, burst_size: u32) -> RateLimitLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter for general API traffic.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Keys are
/// the socket peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>`.
pub fn layer() -> RateLimitLayer {
    bucket(2, 100)
}

/// Stricter limiter for credential endpoints (login, registration).
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// # Example
///
/// ```rust,ignore
/// let auth_routes = Router::new()
///     .route("/auth/login", post(login_handler))
///     .layer(rate_limit::secure_layer());
/// ```
pub fn secure_layer() -> RateLimitLayer {
    bucket(1, 10)
}
