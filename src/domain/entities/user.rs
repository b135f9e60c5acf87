//! User entity and its creation/update inputs.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// `password_hash` holds an argon2id PHC string and must never leave the
/// service layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
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

impl User {
    /// Display name used on bookings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input data for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub is_admin: bool,
}

/// Partial update for a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub is_admin: Option<bool>,
}
