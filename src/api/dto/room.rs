//! DTOs for rooms, room numbers and manual availability blocks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewRoom, Room, RoomNumber, RoomPatch};
use crate::utils::dates::day_list;

#[derive(Debug, Serialize)]
pub struct RoomNumberResponse {
    pub id: i64,
    pub number: i32,
    pub unavailable_dates: Vec<NaiveDate>,
}

impl From<RoomNumber> for RoomNumberResponse {
    fn from(rn: RoomNumber) -> Self {
        Self {
            id: rn.id,
            number: rn.number,
            unavailable_dates: rn.unavailable_dates,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: i64,
    pub hotel_id: i64,
    pub title: String,
    pub price_cents: i64,
    pub max_people: i32,
    pub description: String,
    pub room_numbers: Vec<RoomNumberResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            hotel_id: room.hotel_id,
            title: room.title,
            price_cents: room.price_cents,
            max_people: room.max_people,
            description: room.description,
            room_numbers: room
                .room_numbers
                .into_iter()
                .map(RoomNumberResponse::from)
                .collect(),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    pub hotel_id: i64,

    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price_cents: i64,

    #[validate(range(min = 1, message = "A room holds at least one person"))]
    pub max_people: i32,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,

    #[validate(length(min = 1, message = "At least one room number is required"))]
    pub room_numbers: Vec<i32>,
}

impl From<CreateRoomRequest> for NewRoom {
    fn from(req: CreateRoomRequest) -> Self {
        NewRoom {
            hotel_id: req.hotel_id,
            title: req.title,
            price_cents: req.price_cents,
            max_people: req.max_people,
            description: req.description,
            room_numbers: req.room_numbers,
        }
    }
}

/// Partial room update. Replacing `room_numbers` keeps the unavailable
/// dates of numbers that remain.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(range(min = 1))]
    pub price_cents: Option<i64>,

    #[validate(range(min = 1))]
    pub max_people: Option<i32>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub room_numbers: Option<Vec<i32>>,
}

impl From<UpdateRoomRequest> for RoomPatch {
    fn from(req: UpdateRoomRequest) -> Self {
        RoomPatch {
            title: req.title,
            price_cents: req.price_cents,
            max_people: req.max_people,
            description: req.description,
            room_numbers: req.room_numbers,
        }
    }
}

/// Days to block for one room number.
#[derive(Debug, Deserialize)]
pub struct UnavailableDatesRequest {
    #[serde(with = "day_list")]
    pub dates: Vec<NaiveDate>,
}
