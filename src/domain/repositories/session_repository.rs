//! Repository trait for login sessions.

use crate::domain::entities::Session;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for session tokens.
///
/// Tokens are stored as HMAC-SHA256 hashes; raw tokens never reach storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;

    /// Finds a session that is neither revoked nor expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Records that the session was just used.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn touch(&self, token_hash: &str) -> Result<(), AppError>;

    /// Revokes a session. Returns `Ok(false)` if it was unknown or already revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError>;
}
