//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::Hotel;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for hotel listings, stored as JSON strings.
///
/// All operations are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "hotel:".to_string(),
        })
    }

    fn build_key(&self, hotel_id: i64) -> String {
        format!("{}{}", self.key_prefix, hotel_id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_hotel(&self, hotel_id: i64) -> CacheResult<Option<Hotel>> {
        let key = self.build_key(hotel_id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Hotel>(&raw) {
                Ok(hotel) => {
                    debug!("Cache HIT: hotel {}", hotel_id);
                    Ok(Some(hotel))
                }
                Err(e) => {
                    warn!("Discarding unreadable cache entry {}: {}", key, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: hotel {}", hotel_id);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set_hotel(&self, hotel: &Hotel, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let key = self.build_key(hotel.id);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let raw = match serde_json::to_string(hotel) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize hotel {} for cache: {}", hotel.id, e);
                return Ok(());
            }
        };

        let mut conn = self.client.clone();
        match conn.set_ex::<_, _, ()>(&key, raw, ttl).await {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", key, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn invalidate_hotel(&self, hotel_id: i64) -> CacheResult<()> {
        let key = self.build_key(hotel_id);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", key);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
