//! Handlers for registration, login and session endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, ValidateTokenResponse,
};
use crate::api::dto::user::UserResponse;
use crate::api::middleware::auth::{SESSION_COOKIE, SessionToken};
use crate::application::services::{CurrentUser, IssuedSession};
use crate::error::AppError;
use crate::state::AppState;

/// Builds the `Set-Cookie` value for a session token. `max_age` 0 clears it.
fn session_cookie(token: &str, max_age: i64, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::internal("Failed to build session cookie", json!({})))
}

type SessionResponse = (StatusCode, [(HeaderName, HeaderValue); 1], Json<LoginResponse>);

fn session_response(
    state: &AppState,
    status: StatusCode,
    session: IssuedSession,
) -> Result<SessionResponse, AppError> {
    let max_age = state.auth_service.session_ttl().num_seconds();
    let cookie = session_cookie(&session.token, max_age, state.cookie_secure)?;
    Ok((
        status,
        [(SET_COOKIE, cookie)],
        Json(LoginResponse::from(session)),
    ))
}

/// Registers a new account and signs it in.
///
/// # Endpoint
///
/// `POST /api/users/register`
///
/// # Errors
///
/// - 400 if validation fails
/// - 409 if the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = state.user_service.register(payload.into()).await?;
    let session = state.auth_service.start_session(user.id).await?;

    session_response(&state, StatusCode::CREATED, session)
}

/// Verifies credentials and issues a session.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// The token is returned in the body and set as an `HttpOnly` cookie.
///
/// # Errors
///
/// - 400 if validation fails
/// - 401 for unknown emails or wrong passwords
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    session_response(&state, StatusCode::OK, session)
}

/// `GET /api/auth/validate-token`
pub async fn validate_token_handler(
    Extension(user): Extension<CurrentUser>,
) -> Json<ValidateTokenResponse> {
    Json(ValidateTokenResponse {
        user_id: user.user_id,
    })
}

/// Revokes the current session and clears the cookie.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&token).await?;

    let cookie = session_cookie("", 0, state.cookie_secure)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Signed out".to_string(),
        }),
    ))
}

/// `GET /api/users/me`
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get(user.user_id).await?;
    Ok(Json(user.into()))
}
