//! Session authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::application::services::CurrentUser;
use crate::{error::AppError, state::AppState};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "auth_token";

/// Raw session token of the current request, for logout.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Reads the session token from the `auth_token` cookie.
///
/// Handles multiple cookies in one `Cookie` header and ignores the others.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .find_map(|cookie_str| {
            cookie_str.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(SESSION_COOKIE), Some(value)) if !value.is_empty() => {
                        Some(value.to_string())
                    }
                    _ => None,
                }
            })
        })
}

/// Authenticates requests by session token.
///
/// # Token Sources
///
/// ```text
/// Authorization: Bearer <token>
/// Cookie: auth_token=<token>
/// ```
///
/// The header wins when both are present. On success the request carries
/// [`CurrentUser`] and [`SessionToken`] extensions.
///
/// # Errors
///
/// Returns `401 Unauthorized` if no token is present or the session is
/// unknown, expired or revoked.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/my-bookings", get(my_bookings_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => Some(token),
        Err(_) => cookie_token(&parts.headers),
    }
    .ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({"reason": "Session token is missing"}),
        )
    })?;

    let user = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);
    req.extensions_mut().insert(SessionToken(token));

    Ok(next.run(req).await)
}

/// Rejects non-administrators. Must run after [`layer`].
///
/// # Errors
///
/// Returns `401` if the request was not authenticated and `403` if the
/// caller is not an administrator.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = req
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.is_admin)
        .ok_or_else(|| AppError::unauthorized("Unauthorized", serde_json::json!({})))?;

    if !is_admin {
        return Err(AppError::forbidden(
            "Administrator access required",
            serde_json::json!({}),
        ));
    }

    Ok(next.run(req).await)
}
