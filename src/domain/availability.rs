//! Room availability and reservation construction.
//!
//! Availability is tracked per room number as a list of unavailable days.
//! A stay covers every calendar day from check-in to check-out, both
//! inclusive; a room number is available for the stay iff none of its
//! unavailable days falls inside that set. The price of a reservation is the
//! sum of the selected rooms' nightly prices times the number of nights.

use std::collections::{BTreeSet, HashSet};

use chrono::{Days, NaiveDate};
use serde_json::json;

use crate::domain::entities::{Room, RoomNumber};
use crate::error::AppError;

/// Longest stay accepted, in nights.
pub const MAX_NIGHTS: i64 = 365;

/// Check-in and check-out days of a stay. `check_out` is always after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Validates and builds a stay.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if check-out is not after check-in or
    /// the stay is longer than [`MAX_NIGHTS`].
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, AppError> {
        if check_out <= check_in {
            return Err(AppError::bad_request(
                "Check-out must be after check-in",
                json!({ "check_in": check_in, "check_out": check_out }),
            ));
        }

        let stay = Self {
            check_in,
            check_out,
        };

        if stay.nights() > MAX_NIGHTS {
            return Err(AppError::bad_request(
                "Stay is too long",
                json!({ "max_nights": MAX_NIGHTS, "nights": stay.nights() }),
            ));
        }

        Ok(stay)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every calendar day of the stay, check-in and check-out included.
    pub fn days(&self) -> Vec<NaiveDate> {
        dates_in_range(self.check_in, self.check_out)
    }
}

/// Returns every day from `start` to `end`, both inclusive.
///
/// Returns an empty list when `end` is before `start`.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

/// Returns true iff none of `unavailable_dates` falls in `days`.
pub fn is_available(unavailable_dates: &[NaiveDate], days: &HashSet<NaiveDate>) -> bool {
    !unavailable_dates.iter().any(|d| days.contains(d))
}

/// Room numbers of `room` that can be booked for `stay`, in stored order.
pub fn available_room_numbers<'a>(room: &'a Room, stay: &StayDates) -> Vec<&'a RoomNumber> {
    let days: HashSet<NaiveDate> = stay.days().into_iter().collect();
    room.room_numbers
        .iter()
        .filter(|rn| is_available(&rn.unavailable_dates, &days))
        .collect()
}

/// A room type together with its room numbers that are free for a stay.
#[derive(Debug, Clone)]
pub struct RoomAvailability {
    pub room: Room,
    pub available_numbers: Vec<RoomNumber>,
}

/// Computes availability for every room of a hotel, omitting fully booked rooms.
pub fn hotel_availability(rooms: Vec<Room>, stay: &StayDates) -> Vec<RoomAvailability> {
    rooms
        .into_iter()
        .filter_map(|room| {
            let available_numbers: Vec<RoomNumber> = available_room_numbers(&room, stay)
                .into_iter()
                .cloned()
                .collect();
            (!available_numbers.is_empty()).then_some(RoomAvailability {
                room,
                available_numbers,
            })
        })
        .collect()
}

/// A guest's pick: one specific room number of one room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomSelection {
    pub room_id: i64,
    pub room_number: i32,
}

/// Guest counts for a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestCount {
    pub adults: i32,
    pub children: i32,
}

impl GuestCount {
    pub fn total(&self) -> i64 {
        i64::from(self.adults) + i64::from(self.children)
    }
}

/// A selected room number resolved against the stored room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedRoom {
    pub room_id: i64,
    pub room_number_id: i64,
    pub room_number: i32,
    pub title: String,
    pub price_cents: i64,
    pub max_people: i32,
}

/// Reservation data handed to payment-intent creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub hotel_id: i64,
    pub stay: StayDates,
    pub guests: GuestCount,
    pub rooms: Vec<ReservedRoom>,
    pub total_cost_cents: i64,
}

impl Reservation {
    pub fn nights(&self) -> i64 {
        self.stay.nights()
    }

    /// Days that become unavailable for each reserved room number.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.stay.days()
    }
}

/// Sum of `price_cents × nights` over `rooms`. `None` on overflow.
pub fn total_cost(rooms: &[ReservedRoom], nights: i64) -> Option<i64> {
    rooms.iter().try_fold(0i64, |acc, room| {
        room.price_cents
            .checked_mul(nights)
            .and_then(|line| acc.checked_add(line))
    })
}

/// Resolves `selections` against the hotel's `rooms` and prices the stay.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if no room is selected, a selection is
/// repeated, or the guests exceed the combined capacity of the selected rooms.
/// Returns [`AppError::NotFound`] if a selection names a room that is not part
/// of the hotel or a room number the room does not have.
/// Returns [`AppError::Conflict`] if a selected room number is unavailable for
/// any day of the stay.
pub fn build_reservation(
    hotel_id: i64,
    rooms: &[Room],
    stay: StayDates,
    guests: GuestCount,
    selections: &[RoomSelection],
) -> Result<Reservation, AppError> {
    if selections.is_empty() {
        return Err(AppError::bad_request(
            "Please select at least one available room",
            json!({}),
        ));
    }

    let mut seen = BTreeSet::new();
    for selection in selections {
        if !seen.insert(*selection) {
            return Err(AppError::bad_request(
                "Room number selected more than once",
                json!({ "room_id": selection.room_id, "room_number": selection.room_number }),
            ));
        }
    }

    let days: HashSet<NaiveDate> = stay.days().into_iter().collect();
    let mut reserved = Vec::with_capacity(selections.len());

    for selection in selections {
        let room = rooms
            .iter()
            .find(|r| r.id == selection.room_id && r.hotel_id == hotel_id)
            .ok_or_else(|| {
                AppError::not_found(
                    "Room not found for this hotel",
                    json!({ "hotel_id": hotel_id, "room_id": selection.room_id }),
                )
            })?;

        let room_number = room.room_number(selection.room_number).ok_or_else(|| {
            AppError::not_found(
                "Room number not found",
                json!({ "room_id": room.id, "room_number": selection.room_number }),
            )
        })?;

        if !is_available(&room_number.unavailable_dates, &days) {
            return Err(AppError::conflict(
                "Room number is not available for the selected dates",
                json!({
                    "room_id": room.id,
                    "room_number": room_number.number,
                    "check_in": stay.check_in(),
                    "check_out": stay.check_out(),
                }),
            ));
        }

        reserved.push(ReservedRoom {
            room_id: room.id,
            room_number_id: room_number.id,
            room_number: room_number.number,
            title: room.title.clone(),
            price_cents: room.price_cents,
            max_people: room.max_people,
        });
    }

    let capacity: i64 = reserved.iter().map(|r| i64::from(r.max_people)).sum();
    if guests.total() > capacity {
        return Err(AppError::bad_request(
            "Selected rooms cannot host that many guests",
            json!({ "guests": guests.total(), "capacity": capacity }),
        ));
    }

    let total_cost_cents = total_cost(&reserved, stay.nights())
        .ok_or_else(|| AppError::bad_request("Reservation total is too large", json!({})))?;

    Ok(Reservation {
        hotel_id,
        stay,
        guests,
        rooms: reserved,
        total_cost_cents,
    })
}
