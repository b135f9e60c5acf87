//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Counts hotels
/// 2. **Cache**: Redis PING (always ok when caching is disabled)
/// 3. **Payments**: Reports the configured provider
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 12 hotels" },
///     "cache": { "status": "ok", "message": "Cache reachable" },
///     "payments": { "status": "ok", "message": "Provider: stripe" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let cache_check = check_cache(&state).await;
    let payments_check = CheckStatus::ok(format!(
        "Provider: {}",
        state.booking_service.payment_provider_name()
    ));

    let all_healthy = db_check.is_ok() && cache_check.is_ok() && payments_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
            payments: payments_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.hotel_service.count().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} hotels")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Redis connection failed")
    }
}
