//! DTOs for registration, login and session endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{IssuedSession, UserInput};

/// Public self-registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
}

impl From<RegisterRequest> for UserInput {
    fn from(req: RegisterRequest) -> Self {
        UserInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            country: req.country,
            city: req.city,
            phone: req.phone,
            image_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned on login. The same token is also set as the `auth_token` cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedSession> for LoginResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            token: session.token,
            user_id: session.user_id,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
