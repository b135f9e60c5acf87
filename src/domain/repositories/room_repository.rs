//! Repository trait for rooms, room numbers and their unavailable dates.

use crate::domain::entities::{NewRoom, Room, RoomNumber, RoomPatch};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for rooms.
///
/// Returned [`Room`]s always include their room numbers with unavailable dates
/// sorted ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Creates a room with its room numbers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a room number is repeated.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_room: NewRoom) -> Result<Room, AppError>;

    /// Finds a room by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError>;

    /// Finds the room that owns a room number.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_room_number(&self, room_number_id: i64) -> Result<Option<Room>, AppError>;

    /// Lists the rooms of one hotel ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_hotel(&self, hotel_id: i64) -> Result<Vec<Room>, AppError>;

    /// Lists rooms of hotels owned by `owner_id`, or all rooms when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, owner_id: Option<i64>) -> Result<Vec<Room>, AppError>;

    /// Partially updates a room.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no room has this id.
    async fn update(&self, id: i64, patch: RoomPatch) -> Result<Room, AppError>;

    /// Deletes a room. Returns `Ok(false)` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Marks `dates` unavailable for one room number. Existing dates are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the room number does not exist.
    async fn add_unavailable_dates(
        &self,
        room_number_id: i64,
        dates: Vec<NaiveDate>,
    ) -> Result<RoomNumber, AppError>;
}
