//! Handlers for availability, pricing, payment hand-off and bookings.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::booking::{
    AvailabilityQuery, BookingResponse, PaymentIntentResponse, ReservationPayload,
    ReservationResponse, RoomAvailabilityResponse,
};
use crate::application::services::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Rooms of a hotel with the room numbers free for the whole stay.
///
/// # Endpoint
///
/// `GET /api/hotels/{id}/availability?check_in=2026-08-01&check_out=2026-08-04`
///
/// Rooms with no free number are omitted.
pub async fn availability_handler(
    Path(hotel_id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<RoomAvailabilityResponse>>, AppError> {
    let rooms = state
        .booking_service
        .availability(hotel_id, query.check_in, query.check_out)
        .await?;
    Ok(Json(
        rooms
            .into_iter()
            .map(RoomAvailabilityResponse::from)
            .collect(),
    ))
}

/// Prices a reservation without contacting the payment processor.
///
/// # Endpoint
///
/// `POST /api/hotels/{id}/bookings/quote`
///
/// # Request Body
///
/// ```json
/// {
///   "check_in": "2026-08-01",
///   "check_out": "2026-08-04",
///   "adult_count": 2,
///   "child_count": 0,
///   "rooms": [{ "room_id": 7, "room_number": 101 }]
/// }
/// ```
///
/// # Errors
///
/// - 400 for invalid dates, unknown rooms or too many guests
/// - 404 for unknown hotels
/// - 409 if a selected room number is taken
pub async fn quote_handler(
    Path(hotel_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ReservationPayload>,
) -> Result<Json<ReservationResponse>, AppError> {
    payload.validate()?;
    let reservation = state
        .booking_service
        .quote(hotel_id, &payload.to_request())
        .await?;
    Ok(Json(reservation.into()))
}

/// Prices the reservation and opens a payment intent for its total.
///
/// # Endpoint
///
/// `POST /api/hotels/{id}/bookings/payment-intent`
///
/// Same body as the quote endpoint. The client completes payment with the
/// returned `client_secret`.
pub async fn payment_intent_handler(
    Path(hotel_id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<ReservationPayload>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    payload.validate()?;
    let handoff = state
        .booking_service
        .create_payment_intent(&actor, hotel_id, &payload.to_request())
        .await?;
    Ok(Json(handoff.into()))
}

/// Confirms a paid reservation.
///
/// # Endpoint
///
/// `POST /api/hotels/{id}/bookings`
///
/// Same body as the quote endpoint plus `payment_intent_id`.
///
/// # Errors
///
/// - 400 if the intent does not match the hotel, user or recomputed total
/// - 402 if payment has not succeeded
/// - 409 if the intent was already used or a room number was taken meanwhile
pub async fn confirm_booking_handler(
    Path(hotel_id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    Json(payload): Json<ReservationPayload>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    payload.validate()?;
    let payment_intent_id = payload
        .payment_intent_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(
                "payment_intent_id is required",
                json!({ "field": "payment_intent_id" }),
            )
        })?;

    let booking = state
        .booking_service
        .confirm_booking(&actor, hotel_id, payment_intent_id, &payload.to_request())
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// `GET /api/my-bookings`: the caller's bookings, newest first.
pub async fn my_bookings_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.booking_service.my_bookings(&actor).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}
