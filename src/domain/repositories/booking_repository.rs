//! Repository trait for confirmed bookings.

use crate::domain::entities::{Booking, NewBooking};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Stores a booking, its rooms and the blocked dates of every booked room
    /// number in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the payment intent was already used.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_booking: NewBooking) -> Result<Booking, AppError>;

    /// Finds the booking paid by a payment intent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<Booking>, AppError>;

    /// Lists a guest's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, AppError>;

    /// Lists a hotel's bookings ordered by check-in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_hotel(&self, hotel_id: i64) -> Result<Vec<Booking>, AppError>;
}
