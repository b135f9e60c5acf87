//! Repository trait for hotel listings.

use crate::domain::entities::{Hotel, HotelPage, HotelPatch, HotelSearch, NewHotel};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for hotels.
///
/// Every returned [`Hotel`] carries the ids of its rooms.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgHotelRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// Creates a hotel.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_hotel: NewHotel) -> Result<Hotel, AppError>;

    /// Finds a hotel by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Hotel>, AppError>;

    /// Lists hotels, most recently updated first, optionally restricted to one owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, owner_id: Option<i64>) -> Result<Vec<Hotel>, AppError>;

    /// Runs a filtered, sorted and paginated search.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn search(&self, search: &HotelSearch) -> Result<HotelPage, AppError>;

    /// Partially updates a hotel and bumps `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no hotel has this id.
    async fn update(&self, id: i64, patch: HotelPatch) -> Result<Hotel, AppError>;

    /// Deletes a hotel with its rooms and bookings. Returns `Ok(false)` if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts all hotels.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
