//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing users.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by (lower-cased) email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Partially updates a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this id.
    /// Returns [`AppError::Conflict`] if the new email is taken.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError>;

    /// Deletes a user. Returns `Ok(false)` if the user did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
