//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Hotel;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching hotel listings on the public read path.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures degrade to database lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached hotel.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(hotel))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_hotel(&self, hotel_id: i64) -> CacheResult<Option<Hotel>>;

    /// Stores a hotel with optional TTL (implementation default if `None`).
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log errors
    /// and return `Ok(())`.
    async fn set_hotel(&self, hotel: &Hotel, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached hotel.
    ///
    /// Used whenever the hotel, its rooms or its images change.
    async fn invalidate_hotel(&self, hotel_id: i64) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
