//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::Hotel;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or unreachable at startup.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_hotel(&self, _hotel_id: i64) -> CacheResult<Option<Hotel>> {
        Ok(None)
    }

    async fn set_hotel(&self, _hotel: &Hotel, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate_hotel(&self, _hotel_id: i64) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
