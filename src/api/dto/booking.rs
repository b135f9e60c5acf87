//! DTOs for availability, quotes, payment hand-off and bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::Validate;

use crate::api::dto::room::{RoomNumberResponse, RoomResponse};
use crate::application::services::{PaymentHandoff, ReservationRequest};
use crate::domain::availability::{
    GuestCount, Reservation, ReservedRoom, RoomAvailability, RoomSelection,
};
use crate::domain::entities::{BookedRoom, Booking};
use crate::utils::dates::day;

/// `?check_in=..&check_out=..` for the availability endpoint.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(with = "day")]
    pub check_in: NaiveDate,
    #[serde(with = "day")]
    pub check_out: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct RoomAvailabilityResponse {
    pub room: RoomResponse,
    pub available_numbers: Vec<RoomNumberResponse>,
}

impl From<RoomAvailability> for RoomAvailabilityResponse {
    fn from(a: RoomAvailability) -> Self {
        Self {
            room: RoomResponse::from(a.room),
            available_numbers: a
                .available_numbers
                .into_iter()
                .map(RoomNumberResponse::from)
                .collect(),
        }
    }
}

/// One chosen room number. Ids are accepted as numbers or numeric strings.
#[serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoomSelectionPayload {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub room_id: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub room_number: i32,
}

/// Body of the quote, payment-intent and confirmation endpoints.
///
/// `payment_intent_id` is only read on confirmation.
#[derive(Debug, Deserialize, Validate)]
pub struct ReservationPayload {
    #[serde(with = "day")]
    pub check_in: NaiveDate,
    #[serde(with = "day")]
    pub check_out: NaiveDate,

    #[validate(range(min = 1, message = "At least one adult"))]
    pub adult_count: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub child_count: i32,

    #[validate(length(min = 1, message = "Select at least one room"))]
    pub rooms: Vec<RoomSelectionPayload>,

    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

impl ReservationPayload {
    pub fn to_request(&self) -> ReservationRequest {
        ReservationRequest {
            check_in: self.check_in,
            check_out: self.check_out,
            guests: GuestCount {
                adults: self.adult_count,
                children: self.child_count,
            },
            rooms: self
                .rooms
                .iter()
                .map(|r| RoomSelection {
                    room_id: r.room_id,
                    room_number: r.room_number,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReservedRoomResponse {
    pub room_id: i64,
    pub room_number_id: i64,
    pub room_number: i32,
    pub title: String,
    pub price_cents: i64,
}

impl From<ReservedRoom> for ReservedRoomResponse {
    fn from(r: ReservedRoom) -> Self {
        Self {
            room_id: r.room_id,
            room_number_id: r.room_number_id,
            room_number: r.room_number,
            title: r.title,
            price_cents: r.price_cents,
        }
    }
}

impl From<BookedRoom> for ReservedRoomResponse {
    fn from(r: BookedRoom) -> Self {
        Self {
            room_id: r.room_id,
            room_number_id: r.room_number_id,
            room_number: r.room_number,
            title: r.title,
            price_cents: r.price_cents,
        }
    }
}

/// A priced reservation, as returned by the quote endpoint.
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub hotel_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub adult_count: i32,
    pub child_count: i32,
    pub rooms: Vec<ReservedRoomResponse>,
    pub total_cost_cents: i64,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            hotel_id: r.hotel_id,
            check_in: r.stay.check_in(),
            check_out: r.stay.check_out(),
            nights: r.nights(),
            adult_count: r.guests.adults,
            child_count: r.guests.children,
            rooms: r.rooms.into_iter().map(ReservedRoomResponse::from).collect(),
            total_cost_cents: r.total_cost_cents,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    pub payment_intent_id: String,
    pub client_secret: Option<String>,
    pub total_cost_cents: i64,
    pub nights: i64,
    pub rooms: Vec<ReservedRoomResponse>,
}

impl From<PaymentHandoff> for PaymentIntentResponse {
    fn from(handoff: PaymentHandoff) -> Self {
        let nights = handoff.reservation.nights();
        Self {
            payment_intent_id: handoff.intent.id,
            client_secret: handoff.intent.client_secret,
            total_cost_cents: handoff.reservation.total_cost_cents,
            nights,
            rooms: handoff
                .reservation
                .rooms
                .into_iter()
                .map(ReservedRoomResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
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
    pub rooms: Vec<ReservedRoomResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            hotel_id: b.hotel_id,
            user_id: b.user_id,
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
            adult_count: b.adult_count,
            child_count: b.child_count,
            check_in: b.check_in,
            check_out: b.check_out,
            total_cost_cents: b.total_cost_cents,
            payment_intent_id: b.payment_intent_id,
            rooms: b.rooms.into_iter().map(ReservedRoomResponse::from).collect(),
            created_at: b.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_string_ids_and_timestamps() {
        let payload: ReservationPayload = serde_json::from_str(
            r#"{
                "check_in": "2026-08-01T00:00:00Z",
                "check_out": "2026-08-04",
                "adult_count": 2,
                "rooms": [{"room_id": "7", "room_number": 101}, {"room_id": 8, "room_number": "202"}]
            }"#,
        )
        .unwrap();

        assert!(payload.validate().is_ok());
        let request = payload.to_request();
        assert_eq!(request.check_in, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(request.guests.children, 0);
        assert_eq!(
            request.rooms,
            vec![
                RoomSelection {
                    room_id: 7,
                    room_number: 101
                },
                RoomSelection {
                    room_id: 8,
                    room_number: 202
                },
            ]
        );
        assert!(payload.payment_intent_id.is_none());
    }

    #[test]
    fn test_payload_validation() {
        let payload: ReservationPayload = serde_json::from_str(
            r#"{"check_in": "2026-08-01", "check_out": "2026-08-02", "adult_count": 0, "rooms": []}"#,
        )
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("adult_count"));
        assert!(errors.field_errors().contains_key("rooms"));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = serde_json::from_str::<ReservationPayload>(
            r#"{"check_in": "soon", "check_out": "2026-08-02", "adult_count": 1, "rooms": []}"#,
        );
        assert!(result.is_err());
    }
}
