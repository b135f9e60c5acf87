//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Multipart forms are read through
//! [`crate::api::form::MultipartForm`] and validated the same way.

pub mod auth;
pub mod booking;
pub mod health;
pub mod hotel;
pub mod room;
pub mod user;
