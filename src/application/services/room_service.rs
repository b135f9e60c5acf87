//! Room management service for hotel owners.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::services::auth_service::CurrentUser;
use crate::application::services::hotel_service::ensure_can_manage;
use crate::domain::entities::{Hotel, NewRoom, Room, RoomNumber, RoomPatch};
use crate::domain::repositories::{HotelRepository, RoomRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use serde_json::json;

/// Rejects empty, non-positive or repeated room numbers.
fn check_room_numbers(numbers: &[i32]) -> Result<(), AppError> {
    if numbers.is_empty() {
        return Err(AppError::bad_request(
            "At least one room number is required",
            json!({}),
        ));
    }
    if let Some(bad) = numbers.iter().find(|n| **n <= 0) {
        return Err(AppError::bad_request(
            "Room numbers must be positive",
            json!({ "room_number": bad }),
        ));
    }

    let mut seen = BTreeSet::new();
    if let Some(dup) = numbers.iter().find(|n| !seen.insert(**n)) {
        return Err(AppError::bad_request(
            "Room numbers must be unique within a room",
            json!({ "room_number": dup }),
        ));
    }
    Ok(())
}

/// Service for rooms, their room numbers and per-number unavailable dates.
pub struct RoomService<R: RoomRepository + ?Sized, H: HotelRepository + ?Sized> {
    rooms: Arc<R>,
    hotels: Arc<H>,
    cache: Arc<dyn CacheService>,
}

impl<R: RoomRepository + ?Sized, H: HotelRepository + ?Sized> RoomService<R, H> {
    pub fn new(rooms: Arc<R>, hotels: Arc<H>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            rooms,
            hotels,
            cache,
        }
    }

    async fn hotel(&self, hotel_id: i64) -> Result<Hotel, AppError> {
        self.hotels
            .find_by_id(hotel_id)
            .await?
            .ok_or_else(|| AppError::not_found("Hotel not found", json!({ "id": hotel_id })))
    }

    async fn drop_cached_hotel(&self, hotel_id: i64) {
        if let Err(e) = self.cache.invalidate_hotel(hotel_id).await {
            tracing::warn!(error = ?e, hotel_id, "Failed to invalidate cached hotel after room change");
        }
    }

    async fn managed_room(&self, actor: &CurrentUser, id: i64) -> Result<Room, AppError> {
        let room = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Room not found", json!({ "id": id })))?;
        ensure_can_manage(actor, &self.hotel(room.hotel_id).await?)?;
        Ok(room)
    }

    /// Adds a room to a hotel the actor manages.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad room numbers,
    /// [`AppError::NotFound`] for unknown hotels and [`AppError::Forbidden`]
    /// if the actor does not manage the hotel.
    pub async fn create(&self, actor: &CurrentUser, new_room: NewRoom) -> Result<Room, AppError> {
        check_room_numbers(&new_room.room_numbers)?;
        ensure_can_manage(actor, &self.hotel(new_room.hotel_id).await?)?;

        let room = self.rooms.create(new_room).await?;
        self.drop_cached_hotel(room.hotel_id).await;
        tracing::info!(room_id = room.id, hotel_id = room.hotel_id, "Room created");
        Ok(room)
    }

    /// Rooms of the actor's hotels; administrators see every room.
    pub async fn list(&self, actor: &CurrentUser) -> Result<Vec<Room>, AppError> {
        let owner = (!actor.is_admin).then_some(actor.user_id);
        self.rooms.list(owner).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn get(&self, actor: &CurrentUser, id: i64) -> Result<Room, AppError> {
        self.managed_room(actor, id).await
    }

    /// Public listing of a hotel's rooms.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the hotel does not exist.
    pub async fn list_for_hotel(&self, hotel_id: i64) -> Result<Vec<Room>, AppError> {
        self.hotel(hotel_id).await?;
        self.rooms.list_by_hotel(hotel_id).await
    }

    /// Partially updates a room.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad room numbers,
    /// [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i64,
        patch: RoomPatch,
    ) -> Result<Room, AppError> {
        if let Some(numbers) = &patch.room_numbers {
            check_room_numbers(numbers)?;
        }
        self.managed_room(actor, id).await?;

        let room = self.rooms.update(id, patch).await?;
        self.drop_cached_hotel(room.hotel_id).await;
        Ok(room)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn delete(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        let room = self.managed_room(actor, id).await?;
        if !self.rooms.delete(id).await? {
            return Err(AppError::not_found("Room not found", json!({ "id": id })));
        }
        self.drop_cached_hotel(room.hotel_id).await;
        tracing::info!(room_id = id, "Room deleted");
        Ok(())
    }

    /// Marks days unavailable for one room number (maintenance, offline sales).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `dates` is empty,
    /// [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn add_unavailable_dates(
        &self,
        actor: &CurrentUser,
        room_number_id: i64,
        dates: Vec<NaiveDate>,
    ) -> Result<RoomNumber, AppError> {
        if dates.is_empty() {
            return Err(AppError::bad_request("No dates given", json!({})));
        }

        let room = self
            .rooms
            .find_by_room_number(room_number_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Room number not found",
                    json!({ "room_number_id": room_number_id }),
                )
            })?;
        ensure_can_manage(actor, &self.hotel(room.hotel_id).await?)?;

        let dates: Vec<NaiveDate> = dates.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        self.rooms.add_unavailable_dates(room_number_id, dates).await
    }
}
