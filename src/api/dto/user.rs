//! DTOs for user management.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::form::MultipartForm;
use crate::application::services::{UserInput, UserUpdate};
use crate::domain::entities::User;
use crate::error::AppError;

/// A user as exposed over HTTP. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            country: user.country,
            city: user.city,
            phone: user.phone,
            image_url: user.image_url,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Reads the admin "create user" form. Returns the input and the requested role.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for missing or malformed fields.
pub fn user_input_from_form(
    form: &MultipartForm,
    image_url: Option<String>,
) -> Result<(UserInput, bool), AppError> {
    let input = UserInput {
        email: form.required("email")?,
        password: form.required("password")?,
        first_name: form.required("first_name")?,
        last_name: form.required("last_name")?,
        country: form.text("country"),
        city: form.text("city"),
        phone: form.text("phone"),
        image_url,
    };
    let is_admin = form.flag("is_admin")?.unwrap_or(false);
    Ok((input, is_admin))
}

/// Reads the "edit user" form; absent fields stay unchanged.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for malformed flags.
pub fn user_update_from_form(
    form: &MultipartForm,
    image_url: Option<String>,
) -> Result<UserUpdate, AppError> {
    Ok(UserUpdate {
        email: form.text("email"),
        password: form.text("password"),
        first_name: form.text("first_name"),
        last_name: form.text("last_name"),
        country: form.text("country"),
        city: form.text("city"),
        phone: form.text("phone"),
        image_url,
        is_admin: form.flag("is_admin")?,
    })
}
