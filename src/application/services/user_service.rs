//! User account management service.

use std::sync::Arc;

use crate::application::services::auth_service::CurrentUser;
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::hash_password;
use serde_json::json;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Profile data for a new account, with the plain-text password.
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

/// Partial profile update, with an optional new plain-text password.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub is_admin: Option<bool>,
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters",
            json!({ "min_length": MIN_PASSWORD_LEN }),
        ));
    }
    Ok(())
}

/// Service for registering, reading and editing user accounts.
pub struct UserService<U: UserRepository + ?Sized> {
    repository: Arc<U>,
}

impl<U: UserRepository + ?Sized> UserService<U> {
    pub fn new(repository: Arc<U>) -> Self {
        Self { repository }
    }

    /// Self-service registration. Registered users are never administrators.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for short passwords and
    /// [`AppError::Conflict`] if the email is taken.
    pub async fn register(&self, input: UserInput) -> Result<User, AppError> {
        self.create(input, false).await
    }

    /// Creates an account, optionally with administrator rights.
    ///
    /// # Errors
    ///
    /// See [`Self::register`].
    pub async fn create(&self, input: UserInput, is_admin: bool) -> Result<User, AppError> {
        check_password(&input.password)?;
        let email = input.email.trim().to_lowercase();

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let user = self
            .repository
            .create(NewUser {
                email,
                password_hash: hash_password(&input.password)?,
                first_name: input.first_name,
                last_name: input.last_name,
                country: input.country,
                city: input.city,
                phone: input.phone,
                image_url: input.image_url,
                is_admin,
            })
            .await?;

        tracing::info!(user_id = user.id, is_admin, "User created");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this id.
    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repository.list().await
    }

    /// Updates a profile. Users may edit themselves; administrators may edit
    /// anyone and are the only ones who can change `is_admin`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] when the actor may not make the change,
    /// [`AppError::NotFound`] for unknown users and [`AppError::Conflict`] if
    /// the new email is taken.
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i64,
        update: UserUpdate,
    ) -> Result<User, AppError> {
        if !actor.is_admin && actor.user_id != id {
            return Err(AppError::forbidden(
                "You can only edit your own profile",
                json!({ "id": id }),
            ));
        }
        if !actor.is_admin && update.is_admin.is_some() {
            return Err(AppError::forbidden(
                "Only administrators can change roles",
                json!({}),
            ));
        }

        let password_hash = match update.password.as_deref() {
            Some(password) => {
                check_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        self.repository
            .update(
                id,
                UserPatch {
                    email: update.email.map(|e| e.trim().to_lowercase()),
                    password_hash,
                    first_name: update.first_name,
                    last_name: update.last_name,
                    country: update.country,
                    city: update.city,
                    phone: update.phone,
                    image_url: update.image_url,
                    is_admin: update.is_admin,
                },
            )
            .await
    }

    /// Grants administrator rights to the account with `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this email.
    pub async fn promote(&self, email: &str) -> Result<User, AppError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "email": email })))?;

        self.repository
            .update(
                user.id,
                UserPatch {
                    is_admin: Some(true),
                    ..Default::default()
                },
            )
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this id.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
