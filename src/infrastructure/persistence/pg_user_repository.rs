//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use serde_json::json;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, country, city, \
                            phone, image_url, is_admin, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    country: Option<String>,
    city: Option<String>,
    phone: Option<String>,
    image_url: Option<String>,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            first_name: r.first_name,
            last_name: r.last_name,
            country: r.country,
            city: r.city,
            phone: r.phone,
            image_url: r.image_url,
            is_admin: r.is_admin,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for user accounts.
///
/// Emails are stored lower-cased; the unique index on `email` turns duplicate
/// registrations into [`AppError::Conflict`].
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users \
             (email, password_hash, first_name, last_name, country, city, phone, image_url, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(new_user.email.to_lowercase())
            .bind(new_user.password_hash)
            .bind(new_user.first_name)
            .bind(new_user.last_name)
            .bind(new_user.country)
            .bind(new_user.city)
            .bind(new_user.phone)
            .bind(new_user.image_url)
            .bind(new_user.is_admin)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict { .. } => {
                    AppError::conflict("Email already registered", json!({}))
                }
                other => other,
            })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.to_lowercase())
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET \
                email         = COALESCE($2, email), \
                password_hash = COALESCE($3, password_hash), \
                first_name    = COALESCE($4, first_name), \
                last_name     = COALESCE($5, last_name), \
                country       = COALESCE($6, country), \
                city          = COALESCE($7, city), \
                phone         = COALESCE($8, phone), \
                image_url     = COALESCE($9, image_url), \
                is_admin      = COALESCE($10, is_admin), \
                updated_at    = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(patch.email.map(|e| e.to_lowercase()))
            .bind(patch.password_hash)
            .bind(patch.first_name)
            .bind(patch.last_name)
            .bind(patch.country)
            .bind(patch.city)
            .bind(patch.phone)
            .bind(patch.image_url)
            .bind(patch.is_admin)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict { .. } => {
                    AppError::conflict("Email already registered", json!({}))
                }
                other => other,
            })?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
