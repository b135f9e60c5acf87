//! Handlers for rooms of the owner's hotels.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::room::{
    CreateRoomRequest, RoomNumberResponse, RoomResponse, UnavailableDatesRequest,
    UpdateRoomRequest,
};
use crate::application::services::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/my-rooms`: rooms of the caller's hotels, or every room for admins.
pub async fn list_my_rooms_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<RoomResponse>>, AppError> {
    let rooms = state.room_service.list(&actor).await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// Creates a room type with its room numbers.
///
/// # Endpoint
///
/// `POST /api/my-rooms`
///
/// # Request Body
///
/// ```json
/// {
///   "hotel_id": 1,
///   "title": "Double",
///   "price_cents": 12000,
///   "max_people": 2,
///   "description": "Two beds",
///   "room_numbers": [101, 102]
/// }
/// ```
///
/// # Errors
///
/// - 400 if validation fails or room numbers repeat
/// - 403 if the caller does not manage the hotel
pub async fn create_room_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), AppError> {
    payload.validate()?;
    let room = state.room_service.create(&actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// `GET /api/my-rooms/{id}`
pub async fn get_room_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state.room_service.get(&actor, id).await?;
    Ok(Json(room.into()))
}

/// `PUT /api/my-rooms/{id}`: partial update.
pub async fn update_room_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    payload.validate()?;
    let room = state.room_service.update(&actor, id, payload.into()).await?;
    Ok(Json(room.into()))
}

/// `DELETE /api/my-rooms/{id}`
pub async fn delete_room_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.room_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Blocks days for a single room number.
///
/// # Endpoint
///
/// `PUT /api/my-rooms/availability/{room_number_id}`
///
/// # Request Body
///
/// ```json
/// { "dates": ["2026-08-01", "2026-08-02T00:00:00Z"] }
/// ```
pub async fn add_unavailable_dates_handler(
    Path(room_number_id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<UnavailableDatesRequest>,
) -> Result<Json<RoomNumberResponse>, AppError> {
    let room_number = state
        .room_service
        .add_unavailable_dates(&actor, room_number_id, payload.dates)
        .await?;
    Ok(Json(room_number.into()))
}
