//! Authentication service for login sessions.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::verify_password;
use crate::utils::random::{SESSION_TOKEN_BYTES, random_token};
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// The authenticated caller, attached to requests by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// A freshly issued session token. The raw token is only ever returned here.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Service for password login and session token validation.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot
/// replay sessions without the server-side secret.
pub struct AuthService<U: UserRepository + ?Sized, S: SessionRepository + ?Sized> {
    users: Arc<U>,
    sessions: Arc<S>,
    signing_secret: String,
    session_ttl: Duration,
}

impl<U: UserRepository + ?Sized, S: SessionRepository + ?Sized> AuthService<U, S> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; rotating it invalidates every session
    /// - `session_ttl` - lifetime of issued sessions
    pub fn new(
        users: Arc<U>,
        sessions: Arc<S>,
        signing_secret: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            signing_secret,
            session_ttl,
        }
    }

    /// Lifetime of issued sessions.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the email is unknown or the
    /// password does not match. Both cases share one message.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let invalid = || AppError::unauthorized("Invalid credentials", json!({}));

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            return Err(invalid());
        }

        let session = self.start_session(user.id).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(session)
    }

    /// Issues a new session for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on RNG or database errors.
    pub async fn start_session(&self, user_id: i64) -> Result<IssuedSession, AppError> {
        let token = random_token(SESSION_TOKEN_BYTES)?;
        let expires_at = Utc::now() + self.session_ttl;

        self.sessions
            .create(user_id, &self.hash_token(&token), expires_at)
            .await?;

        Ok(IssuedSession {
            token,
            user_id,
            expires_at,
        })
    }

    /// Resolves a raw token to the user it belongs to.
    ///
    /// On success, records the session as used.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, expired or
    /// revoked, or its user no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_hash = self.hash_token(token);

        let session = self
            .sessions
            .find_active(&token_hash)
            .await?
            .filter(|s| s.is_active_at(Utc::now()))
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid, expired or revoked session"}),
                )
            })?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({"reason": "User no longer exists"}))
            })?;

        if let Err(e) = self.sessions.touch(&token_hash).await {
            tracing::debug!(error = ?e, session_id = session.id, "Failed to record session use");
        }

        Ok(CurrentUser::from(&user))
    }

    /// Revokes the session behind `token`. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions.revoke(&self.hash_token(token)).await?;
        Ok(())
    }
}
