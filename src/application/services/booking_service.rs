//! Availability, quoting, payment hand-off and booking confirmation.
//!
//! The reservation is always rebuilt on the server from stored rooms and
//! prices; the client only names dates, guests and room numbers.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::application::services::auth_service::CurrentUser;
use crate::application::services::hotel_service::ensure_can_manage;
use crate::domain::availability::{
    GuestCount, Reservation, RoomAvailability, RoomSelection, StayDates, build_reservation,
    hotel_availability,
};
use crate::domain::entities::{BookedRoom, Booking, Hotel, NewBooking};
use crate::domain::repositories::{BookingRepository, HotelRepository, RoomRepository};
use crate::error::AppError;
use crate::infrastructure::payments::{
    CreateIntent, PaymentIntent, PaymentProvider, PaymentStatus, check_intent_id,
};

/// What the guest asks to reserve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: GuestCount,
    pub rooms: Vec<RoomSelection>,
}

/// A reservation together with the payment intent that will pay for it.
#[derive(Debug, Clone)]
pub struct PaymentHandoff {
    pub reservation: Reservation,
    pub intent: PaymentIntent,
}

/// Service orchestrating the reservation flow.
pub struct BookingService<
    B: BookingRepository + ?Sized,
    R: RoomRepository + ?Sized,
    H: HotelRepository + ?Sized,
> {
    bookings: Arc<B>,
    rooms: Arc<R>,
    hotels: Arc<H>,
    payments: Arc<dyn PaymentProvider>,
    currency: String,
}

impl<B, R, H> BookingService<B, R, H>
where
    B: BookingRepository + ?Sized,
    R: RoomRepository + ?Sized,
    H: HotelRepository + ?Sized,
{
    pub fn new(
        bookings: Arc<B>,
        rooms: Arc<R>,
        hotels: Arc<H>,
        payments: Arc<dyn PaymentProvider>,
        currency: String,
    ) -> Self {
        Self {
            bookings,
            rooms,
            hotels,
            payments,
            currency,
        }
    }

    /// Name of the configured payment provider.
    pub fn payment_provider_name(&self) -> &'static str {
        self.payments.name()
    }

    async fn hotel(&self, hotel_id: i64) -> Result<Hotel, AppError> {
        self.hotels
            .find_by_id(hotel_id)
            .await?
            .ok_or_else(|| AppError::not_found("Hotel not found", json!({ "id": hotel_id })))
    }

    /// Rooms of a hotel with the room numbers free for the whole stay.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid dates and
    /// [`AppError::NotFound`] for unknown hotels.
    pub async fn availability(
        &self,
        hotel_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<RoomAvailability>, AppError> {
        let stay = StayDates::new(check_in, check_out)?;
        self.hotel(hotel_id).await?;
        let rooms = self.rooms.list_by_hotel(hotel_id).await?;
        Ok(hotel_availability(rooms, &stay))
    }

    /// Builds and prices a reservation without touching the payment processor.
    ///
    /// # Errors
    ///
    /// See [`build_reservation`]; additionally [`AppError::NotFound`] for
    /// unknown hotels.
    pub async fn quote(
        &self,
        hotel_id: i64,
        request: &ReservationRequest,
    ) -> Result<Reservation, AppError> {
        let stay = StayDates::new(request.check_in, request.check_out)?;
        self.hotel(hotel_id).await?;
        let rooms = self.rooms.list_by_hotel(hotel_id).await?;

        build_reservation(hotel_id, &rooms, stay, request.guests, &request.rooms).inspect_err(
            |e| {
                if matches!(e, AppError::Conflict { .. }) {
                    metrics::counter!("booking_conflicts_total").increment(1);
                }
            },
        )
    }

    /// Prices the reservation and opens a payment intent for its total.
    ///
    /// The intent carries `hotel_id` and `user_id` metadata, checked again at
    /// confirmation.
    ///
    /// # Errors
    ///
    /// See [`Self::quote`]; [`AppError::BadGateway`] if the processor fails.
    pub async fn create_payment_intent(
        &self,
        actor: &CurrentUser,
        hotel_id: i64,
        request: &ReservationRequest,
    ) -> Result<PaymentHandoff, AppError> {
        let reservation = self.quote(hotel_id, request).await?;

        let intent = self
            .payments
            .create_intent(CreateIntent {
                amount: reservation.total_cost_cents,
                currency: self.currency.clone(),
                metadata: vec![
                    ("hotel_id".to_string(), hotel_id.to_string()),
                    ("user_id".to_string(), actor.user_id.to_string()),
                ],
            })
            .await?;

        metrics::counter!("payment_intents_created_total").increment(1);
        tracing::info!(
            hotel_id,
            user_id = actor.user_id,
            payment_intent_id = %intent.id,
            amount = reservation.total_cost_cents,
            "Payment intent created"
        );

        Ok(PaymentHandoff {
            reservation,
            intent,
        })
    }

    /// Confirms a paid reservation and blocks its days for the booked room numbers.
    ///
    /// Availability is re-checked here but not locked; a concurrent booking of
    /// the same room number between check and write wins or loses by timing.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] if the intent was already used or a room number
    ///   became unavailable
    /// - [`AppError::PaymentRequired`] if the intent has not succeeded
    /// - [`AppError::Validation`] if the intent id is malformed, belongs to
    ///   another hotel or user, or its amount differs from the recomputed total
    pub async fn confirm_booking(
        &self,
        actor: &CurrentUser,
        hotel_id: i64,
        payment_intent_id: &str,
        request: &ReservationRequest,
    ) -> Result<Booking, AppError> {
        check_intent_id(payment_intent_id)?;

        if self
            .bookings
            .find_by_payment_intent(payment_intent_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Payment intent already used for a booking",
                json!({ "payment_intent_id": payment_intent_id }),
            ));
        }

        let intent = self.payments.retrieve_intent(payment_intent_id).await?;

        if intent.status != PaymentStatus::Succeeded {
            return Err(AppError::payment_required(
                "Payment has not succeeded",
                json!({ "payment_intent_id": intent.id, "status": intent.status }),
            ));
        }
        if intent.metadata_id("hotel_id") != Some(hotel_id)
            || intent.metadata_id("user_id") != Some(actor.user_id)
        {
            return Err(AppError::bad_request(
                "Payment intent does not match this booking",
                json!({ "payment_intent_id": intent.id }),
            ));
        }

        let reservation = self.quote(hotel_id, request).await?;

        if intent.amount != reservation.total_cost_cents {
            return Err(AppError::bad_request(
                "Payment amount does not match the reservation total",
                json!({ "paid": intent.amount, "total": reservation.total_cost_cents }),
            ));
        }

        let booking = self
            .bookings
            .create(NewBooking {
                hotel_id,
                user_id: actor.user_id,
                first_name: actor.first_name.clone(),
                last_name: actor.last_name.clone(),
                email: actor.email.clone(),
                adult_count: reservation.guests.adults,
                child_count: reservation.guests.children,
                check_in: reservation.stay.check_in(),
                check_out: reservation.stay.check_out(),
                total_cost_cents: reservation.total_cost_cents,
                payment_intent_id: intent.id.clone(),
                blocked_dates: reservation.days(),
                rooms: reservation
                    .rooms
                    .iter()
                    .map(|r| BookedRoom {
                        room_id: r.room_id,
                        room_number_id: r.room_number_id,
                        room_number: r.room_number,
                        title: r.title.clone(),
                        price_cents: r.price_cents,
                    })
                    .collect(),
            })
            .await?;

        metrics::counter!("bookings_confirmed_total").increment(1);
        tracing::info!(
            booking_id = booking.id,
            hotel_id,
            user_id = actor.user_id,
            nights = reservation.nights(),
            "Booking confirmed"
        );

        Ok(booking)
    }

    /// The actor's bookings, newest first.
    pub async fn my_bookings(&self, actor: &CurrentUser) -> Result<Vec<Booking>, AppError> {
        self.bookings.list_by_user(actor.user_id).await
    }

    /// Bookings of a hotel the actor manages.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn hotel_bookings(
        &self,
        actor: &CurrentUser,
        hotel_id: i64,
    ) -> Result<Vec<Booking>, AppError> {
        ensure_can_manage(actor, &self.hotel(hotel_id).await?)?;
        self.bookings.list_by_hotel(hotel_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Room, RoomNumber};
    use crate::domain::repositories::{
        MockBookingRepository, MockHotelRepository, MockRoomRepository,
    };
    use crate::infrastructure::payments::MockPaymentProvider;
    use chrono::Utc;
    use std::collections::HashMap;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hotel(id: i64) -> Hotel {
        Hotel {
            id,
            user_id: 50,
            name: "Sea".to_string(),
            city: "Faro".to_string(),
            country: "Portugal".to_string(),
            description: "Sun".to_string(),
            hotel_type: "Resort".to_string(),
            adult_count: 4,
            child_count: 2,
            facilities: vec![],
            price_per_night_cents: 10_000,
            star_rating: 4,
            image_urls: vec![],
            last_updated: Utc::now(),
            room_ids: vec![1, 2],
        }
    }

    fn rooms() -> Vec<Room> {
        vec![
            Room {
                id: 1,
                hotel_id: 1,
                title: "Double".to_string(),
                price_cents: 10_000,
                max_people: 2,
                description: "d".to_string(),
                room_numbers: vec![
                    RoomNumber {
                        id: 11,
                        number: 101,
                        unavailable_dates: vec![d("2026-08-03")],
                    },
                    RoomNumber {
                        id: 12,
                        number: 102,
                        unavailable_dates: vec![],
                    },
                ],
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            Room {
                id: 2,
                hotel_id: 1,
                title: "Suite".to_string(),
                price_cents: 25_000,
                max_people: 4,
                description: "s".to_string(),
                room_numbers: vec![RoomNumber {
                    id: 21,
                    number: 201,
                    unavailable_dates: vec![],
                }],
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        ]
    }

    fn guest() -> CurrentUser {
        CurrentUser {
            user_id: 7,
            email: "guest@example.com".to_string(),
            first_name: "Gil".to_string(),
            last_name: "Eanes".to_string(),
            is_admin: false,
        }
    }

    fn request(rooms: Vec<(i64, i32)>) -> ReservationRequest {
        ReservationRequest {
            check_in: d("2026-08-01"),
            check_out: d("2026-08-04"),
            guests: GuestCount {
                adults: 2,
                children: 0,
            },
            rooms: rooms
                .into_iter()
                .map(|(room_id, room_number)| RoomSelection {
                    room_id,
                    room_number,
                })
                .collect(),
        }
    }

    fn intent(amount: i64, status: PaymentStatus, hotel_id: i64, user_id: i64) -> PaymentIntent {
        PaymentIntent {
            id: "pi_123".to_string(),
            client_secret: Some("pi_123_secret".to_string()),
            amount,
            currency: "usd".to_string(),
            status,
            metadata: HashMap::from([
                ("hotel_id".to_string(), hotel_id.to_string()),
                ("user_id".to_string(), user_id.to_string()),
            ]),
        }
    }

    fn repos() -> (MockBookingRepository, MockRoomRepository, MockHotelRepository) {
        let bookings = MockBookingRepository::new();
        let mut room_repo = MockRoomRepository::new();
        let mut hotel_repo = MockHotelRepository::new();
        room_repo.expect_list_by_hotel().returning(|_| Ok(rooms()));
        hotel_repo.expect_find_by_id().returning(|id| Ok(Some(hotel(id))));
        (bookings, room_repo, hotel_repo)
    }

    fn service(
        bookings: MockBookingRepository,
        room_repo: MockRoomRepository,
        hotel_repo: MockHotelRepository,
        payments: MockPaymentProvider,
    ) -> BookingService<MockBookingRepository, MockRoomRepository, MockHotelRepository> {
        BookingService::new(
            Arc::new(bookings),
            Arc::new(room_repo),
            Arc::new(hotel_repo),
            Arc::new(payments),
            "usd".to_string(),
        )
    }

    #[tokio::test]
    async fn test_availability_excludes_blocked_numbers() {
        let (b, r, h) = repos();
        let svc = service(b, r, h, MockPaymentProvider::new());

        // 101 is blocked on 08-03, which lies inside 08-01..=08-04
        let available = svc
            .availability(1, d("2026-08-01"), d("2026-08-04"))
            .await
            .unwrap();

        let double = available.iter().find(|a| a.room.id == 1).unwrap();
        let numbers: Vec<i32> = double.available_numbers.iter().map(|n| n.number).collect();
        assert_eq!(numbers, vec![102]);
    }

    #[tokio::test]
    async fn test_availability_checkout_day_counts() {
        let (b, r, h) = repos();
        let svc = service(b, r, h, MockPaymentProvider::new());

        let available = svc
            .availability(1, d("2026-07-30"), d("2026-08-03"))
            .await
            .unwrap();
        let double = available.iter().find(|a| a.room.id == 1).unwrap();
        assert_eq!(double.available_numbers.len(), 1);

        let available = svc
            .availability(1, d("2026-07-30"), d("2026-08-02"))
            .await
            .unwrap();
        let double = available.iter().find(|a| a.room.id == 1).unwrap();
        assert_eq!(double.available_numbers.len(), 2);
    }

    #[tokio::test]
    async fn test_availability_rejects_reversed_dates() {
        let (b, r, h) = repos();
        let err = service(b, r, h, MockPaymentProvider::new())
            .availability(1, d("2026-08-04"), d("2026-08-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_payment_intent_for_total() {
        let (b, r, h) = repos();
        let mut payments = MockPaymentProvider::new();
        payments
            .expect_create_intent()
            .withf(|req| {
                req.amount == 105_000
                    && req.currency == "usd"
                    && req.metadata.contains(&("hotel_id".to_string(), "1".to_string()))
                    && req.metadata.contains(&("user_id".to_string(), "7".to_string()))
            })
            .times(1)
            .returning(|req| Ok(intent(req.amount, PaymentStatus::RequiresPaymentMethod, 1, 7)));

        // 3 nights x (100.00 + 250.00)
        let handoff = service(b, r, h, payments)
            .create_payment_intent(&guest(), 1, &request(vec![(1, 102), (2, 201)]))
            .await
            .unwrap();

        assert_eq!(handoff.reservation.total_cost_cents, 105_000);
        assert_eq!(handoff.reservation.nights(), 3);
        assert_eq!(handoff.intent.id, "pi_123");
    }

    #[tokio::test]
    async fn test_create_payment_intent_unavailable_number_conflicts() {
        let (b, r, h) = repos();
        let mut payments = MockPaymentProvider::new();
        payments.expect_create_intent().never();

        let err = service(b, r, h, payments)
            .create_payment_intent(&guest(), 1, &request(vec![(1, 101)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_confirm_booking_blocks_every_day_of_stay() {
        let (mut b, r, h) = repos();
        b.expect_find_by_payment_intent().returning(|_| Ok(None));
        b.expect_create()
            .withf(|nb| {
                nb.blocked_dates
                    == vec![d("2026-08-01"), d("2026-08-02"), d("2026-08-03"), d("2026-08-04")]
                    && nb.total_cost_cents == 30_000
                    && nb.rooms.len() == 1
                    && nb.rooms[0].room_number_id == 12
                    && nb.first_name == "Gil"
            })
            .times(1)
            .returning(|nb| {
                Ok(Booking {
                    id: 1,
                    hotel_id: nb.hotel_id,
                    user_id: nb.user_id,
                    first_name: nb.first_name,
                    last_name: nb.last_name,
                    email: nb.email,
                    adult_count: nb.adult_count,
                    child_count: nb.child_count,
                    check_in: nb.check_in,
                    check_out: nb.check_out,
                    total_cost_cents: nb.total_cost_cents,
                    payment_intent_id: nb.payment_intent_id,
                    rooms: nb.rooms,
                    created_at: Utc::now(),
                })
            });

        let mut payments = MockPaymentProvider::new();
        payments
            .expect_retrieve_intent()
            .returning(|_| Ok(intent(30_000, PaymentStatus::Succeeded, 1, 7)));

        let booking = service(b, r, h, payments)
            .confirm_booking(&guest(), 1, "pi_123", &request(vec![(1, 102)]))
            .await
            .unwrap();

        assert_eq!(booking.total_cost_cents, 30_000);
        assert_eq!(booking.payment_intent_id, "pi_123");
    }

    #[tokio::test]
    async fn test_confirm_booking_requires_succeeded_payment() {
        let (mut b, r, h) = repos();
        b.expect_find_by_payment_intent().returning(|_| Ok(None));
        b.expect_create().never();

        let mut payments = MockPaymentProvider::new();
        payments
            .expect_retrieve_intent()
            .returning(|_| Ok(intent(30_000, PaymentStatus::RequiresAction, 1, 7)));

        let err = service(b, r, h, payments)
            .confirm_booking(&guest(), 1, "pi_123", &request(vec![(1, 102)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PaymentRequired { .. }));
    }

    #[tokio::test]
    async fn test_confirm_booking_rejects_amount_mismatch() {
        let (mut b, r, h) = repos();
        b.expect_find_by_payment_intent().returning(|_| Ok(None));
        b.expect_create().never();

        let mut payments = MockPaymentProvider::new();
        payments
            .expect_retrieve_intent()
            .returning(|_| Ok(intent(100, PaymentStatus::Succeeded, 1, 7)));

        let err = service(b, r, h, payments)
            .confirm_booking(&guest(), 1, "pi_123", &request(vec![(1, 102)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_confirm_booking_rejects_other_users_intent() {
        let (mut b, r, h) = repos();
        b.expect_find_by_payment_intent().returning(|_| Ok(None));
        b.expect_create().never();

        let mut payments = MockPaymentProvider::new();
        payments
            .expect_retrieve_intent()
            .returning(|_| Ok(intent(30_000, PaymentStatus::Succeeded, 1, 8)));

        let err = service(b, r, h, payments)
            .confirm_booking(&guest(), 1, "pi_123", &request(vec![(1, 102)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_confirm_booking_reused_intent_conflicts() {
        let (mut b, r, h) = repos();
        b.expect_find_by_payment_intent().returning(|pi| {
            Ok(Some(Booking {
                id: 9,
                hotel_id: 1,
                user_id: 7,
                first_name: "Gil".to_string(),
                last_name: "Eanes".to_string(),
                email: "guest@example.com".to_string(),
                adult_count: 2,
                child_count: 0,
                check_in: d("2026-08-01"),
                check_out: d("2026-08-04"),
                total_cost_cents: 30_000,
                payment_intent_id: pi.to_string(),
                rooms: vec![],
                created_at: Utc::now(),
            }))
        });

        let mut payments = MockPaymentProvider::new();
        payments.expect_retrieve_intent().never();

        let err = service(b, r, h, payments)
            .confirm_booking(&guest(), 1, "pi_123", &request(vec![(1, 102)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_hotel_bookings_requires_ownership() {
        let (mut b, r, h) = repos();
        b.expect_list_by_hotel().never();

        let err = service(b, r, h, MockPaymentProvider::new())
            .hotel_bookings(&guest(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }
}
