//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into application operations and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`form`] - Multipart form collection for image uploads
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication and request processing middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod routes;
