//! Room type entity with its individually tracked room numbers.

use chrono::{DateTime, NaiveDate, Utc};

/// A room type within a hotel (e.g. "Deluxe Double"), priced per night.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: i64,
    pub hotel_id: i64,
    pub title: String,
    pub price_cents: i64,
    pub max_people: i32,
    pub description: String,
    pub room_numbers: Vec<RoomNumber>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Finds a room number unit by its printed number.
    pub fn room_number(&self, number: i32) -> Option<&RoomNumber> {
        self.room_numbers.iter().find(|rn| rn.number == number)
    }
}

/// A physical unit of a room type, with the days it cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomNumber {
    pub id: i64,
    pub number: i32,
    pub unavailable_dates: Vec<NaiveDate>,
}

/// Input data for creating a room.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub hotel_id: i64,
    pub title: String,
    pub price_cents: i64,
    pub max_people: i32,
    pub description: String,
    pub room_numbers: Vec<i32>,
}

/// Partial update for a room.
///
/// When `room_numbers` is set, numbers not listed are removed and new ones are
/// added; numbers that remain keep their unavailable dates.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub title: Option<String>,
    pub price_cents: Option<i64>,
    pub max_people: Option<i32>,
    pub description: Option<String>,
    pub room_numbers: Option<Vec<i32>>,
}
