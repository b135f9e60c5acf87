//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching, payments and file
//! storage.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`payments`] - Payment processor clients
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`storage`] - Uploaded image storage

pub mod cache;
pub mod payments;
pub mod persistence;
pub mod storage;
