//! Hotel listing service: owner CRUD, public reads and search.

use std::sync::Arc;

use crate::application::services::auth_service::CurrentUser;
use crate::domain::entities::{
    Hotel, HotelPage, HotelPatch, HotelSearch, MAX_SEARCH_PAGE, NewHotel,
};
use crate::domain::repositories::HotelRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use serde_json::json;

/// Results per search page.
pub const SEARCH_PAGE_SIZE: i64 = 5;

/// Returns an error unless `actor` owns `hotel` or is an administrator.
pub fn ensure_can_manage(actor: &CurrentUser, hotel: &Hotel) -> Result<(), AppError> {
    if actor.is_admin || hotel.is_owned_by(actor.user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "You do not manage this hotel",
            json!({ "hotel_id": hotel.id }),
        ))
    }
}

/// Service for hotel listings.
///
/// Public single-hotel reads go through the cache; every write invalidates
/// the cached entry.
pub struct HotelService<H: HotelRepository + ?Sized> {
    repository: Arc<H>,
    cache: Arc<dyn CacheService>,
    cache_ttl_seconds: u64,
}

impl<H: HotelRepository + ?Sized> HotelService<H> {
    pub fn new(repository: Arc<H>, cache: Arc<dyn CacheService>, cache_ttl_seconds: u64) -> Self {
        Self {
            repository,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Creates a hotel owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create(&self, actor: &CurrentUser, mut new_hotel: NewHotel) -> Result<Hotel, AppError> {
        new_hotel.user_id = actor.user_id;
        let hotel = self.repository.create(new_hotel).await?;
        tracing::info!(hotel_id = hotel.id, owner = actor.user_id, "Hotel created");
        Ok(hotel)
    }

    /// Hotels owned by `actor`, most recently updated first.
    pub async fn list_mine(&self, actor: &CurrentUser) -> Result<Vec<Hotel>, AppError> {
        self.repository.list(Some(actor.user_id)).await
    }

    /// Every hotel, most recently updated first.
    pub async fn list_all(&self) -> Result<Vec<Hotel>, AppError> {
        self.repository.list(None).await
    }

    /// Loads a hotel the actor may manage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn get_managed(&self, actor: &CurrentUser, id: i64) -> Result<Hotel, AppError> {
        let hotel = self.find(id).await?;
        ensure_can_manage(actor, &hotel)?;
        Ok(hotel)
    }

    /// Public read of one hotel, served from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no hotel has this id.
    pub async fn get(&self, id: i64) -> Result<Hotel, AppError> {
        if let Ok(Some(hotel)) = self.cache.get_hotel(id).await {
            return Ok(hotel);
        }

        let hotel = self.find(id).await?;
        if let Err(e) = self.cache.set_hotel(&hotel, Some(self.cache_ttl_seconds)).await {
            tracing::warn!(error = ?e, hotel_id = id, "Failed to cache hotel");
        }
        Ok(hotel)
    }

    /// Updates a hotel the actor may manage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i64,
        patch: HotelPatch,
    ) -> Result<Hotel, AppError> {
        self.get_managed(actor, id).await?;
        let hotel = self.repository.update(id, patch).await?;
        self.invalidate(id).await;
        Ok(hotel)
    }

    /// Deletes a hotel the actor may manage, with its rooms and bookings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn delete(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        self.get_managed(actor, id).await?;
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Hotel not found", json!({ "id": id })));
        }
        self.invalidate(id).await;
        tracing::info!(hotel_id = id, "Hotel deleted");
        Ok(())
    }

    /// Runs a search. `page` is clamped to at least 1 and the page size is fixed.
    pub async fn search(&self, mut search: HotelSearch) -> Result<HotelPage, AppError> {
        search.page = search.page.clamp(1, MAX_SEARCH_PAGE);
        search.page_size = SEARCH_PAGE_SIZE;
        self.repository.search(&search).await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Drops the cached copy of a hotel.
    pub async fn invalidate(&self, id: i64) {
        if let Err(e) = self.cache.invalidate_hotel(id).await {
            tracing::warn!(error = ?e, hotel_id = id, "Failed to invalidate cached hotel");
        }
    }

    async fn find(&self, id: i64) -> Result<Hotel, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hotel not found", json!({ "id": id })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockHotelRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache};
    use chrono::Utc;

    fn hotel(id: i64, owner: i64) -> Hotel {
        Hotel {
            id,
            user_id: owner,
            name: "Harbor Inn".to_string(),
            city: "Porto".to_string(),
            country: "Portugal".to_string(),
            description: "Quiet".to_string(),
            hotel_type: "Budget".to_string(),
            adult_count: 2,
            child_count: 0,
            facilities: vec![],
            price_per_night_cents: 8_000,
            star_rating: 3,
            image_urls: vec![],
            last_updated: Utc::now(),
            room_ids: vec![],
        }
    }

    fn actor(user_id: i64, is_admin: bool) -> CurrentUser {
        CurrentUser {
            user_id,
            email: "owner@example.com".to_string(),
            first_name: "O".to_string(),
            last_name: "W".to_string(),
            is_admin,
        }
    }

    fn service(repo: MockHotelRepository) -> HotelService<MockHotelRepository> {
        HotelService::new(Arc::new(repo), Arc::new(NullCache::new()), 60)
    }

    #[test]
    fn test_ensure_can_manage() {
        let h = hotel(1, 10);
        assert!(ensure_can_manage(&actor(10, false), &h).is_ok());
        assert!(ensure_can_manage(&actor(99, true), &h).is_ok());
        assert!(matches!(
            ensure_can_manage(&actor(11, false), &h),
            Err(AppError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_assigns_owner() {
        let mut repo = MockHotelRepository::new();
        repo.expect_create()
            .withf(|h| h.user_id == 10)
            .times(1)
            .returning(|h| Ok(hotel(1, h.user_id)));

        let new_hotel = NewHotel {
            user_id: 0,
            name: "Harbor Inn".to_string(),
            city: "Porto".to_string(),
            country: "Portugal".to_string(),
            description: "Quiet".to_string(),
            hotel_type: "Budget".to_string(),
            adult_count: 2,
            child_count: 0,
            facilities: vec![],
            price_per_night_cents: 8_000,
            star_rating: 3,
            image_urls: vec![],
        };

        let created = service(repo).create(&actor(10, false), new_hotel).await.unwrap();
        assert_eq!(created.user_id, 10);
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_forbidden() {
        let mut repo = MockHotelRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(hotel(id, 10))));
        repo.expect_update().never();

        let err = service(repo)
            .update(&actor(11, false), 1, HotelPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_get_missing_hotel() {
        let mut repo = MockHotelRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo).get(5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_uses_cache_hit() {
        let mut repo = MockHotelRepository::new();
        repo.expect_find_by_id().never();

        let mut cache = MockCacheService::new();
        cache
            .expect_get_hotel()
            .withf(|id| *id == 3)
            .returning(|id| Ok(Some(hotel(id, 1))));

        let service = HotelService::new(Arc::new(repo), Arc::new(cache), 60);
        assert_eq!(service.get(3).await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_get_populates_cache_on_miss() {
        let mut repo = MockHotelRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(hotel(id, 1))));

        let mut cache = MockCacheService::new();
        cache.expect_get_hotel().returning(|_| Ok(None));
        cache
            .expect_set_hotel()
            .withf(|h, ttl| h.id == 3 && *ttl == Some(60))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = HotelService::new(Arc::new(repo), Arc::new(cache), 60);
        assert_eq!(service.get(3).await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_get_survives_cache_write_failure() {
        let mut repo = MockHotelRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(hotel(id, 1))));

        let mut cache = MockCacheService::new();
        cache.expect_get_hotel().returning(|_| Ok(None));
        cache
            .expect_set_hotel()
            .times(1)
            .returning(|_, _| Err(CacheError::OperationError("READONLY".to_string())));

        let service = HotelService::new(Arc::new(repo), Arc::new(cache), 60);
        assert_eq!(service.get(3).await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let mut repo = MockHotelRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(hotel(id, 10))));
        repo.expect_delete().times(1).returning(|_| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_hotel()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let service = HotelService::new(Arc::new(repo), Arc::new(cache), 60);
        service.delete(&actor(10, false), 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_clamps_page_and_fixes_size() {
        let mut repo = MockHotelRepository::new();
        repo.expect_search()
            .withf(|s| s.page == 1 && s.page_size == SEARCH_PAGE_SIZE)
            .times(1)
            .returning(|_| Ok(HotelPage { items: vec![], total: 0 }));

        let search = HotelSearch {
            page: 0,
            page_size: 100,
            ..Default::default()
        };
        let page = service(repo).search(search).await.unwrap();
        assert_eq!(page.total, 0);
    }
}
