//! Confirmed booking entity.

use chrono::{DateTime, NaiveDate, Utc};

/// A confirmed, paid stay.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i64,
    pub hotel_id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_cost_cents: i64,
    pub payment_intent_id: String,
    pub rooms: Vec<BookedRoom>,
    pub created_at: DateTime<Utc>,
}

/// A room number held by a booking, with the price charged for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedRoom {
    pub room_id: i64,
    pub room_number_id: i64,
    pub room_number: i32,
    pub title: String,
    pub price_cents: i64,
}

/// Input data for persisting a booking.
///
/// `blocked_dates` are written as unavailable for every booked room number in
/// the same transaction as the booking row.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_cost_cents: i64,
    pub payment_intent_id: String,
    pub rooms: Vec<BookedRoom>,
    pub blocked_dates: Vec<NaiveDate>,
}
