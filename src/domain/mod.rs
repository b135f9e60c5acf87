//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`availability`] - Date-range availability and reservation pricing
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//!
//! # Reservation Flow
//!
//! 1. The guest asks for availability of a hotel between two dates
//! 2. [`availability::hotel_availability`] filters room numbers per room
//! 3. The guest selects specific room numbers
//! 4. [`availability::build_reservation`] validates the selection and prices it
//! 5. The reservation total is sent to the payment provider as a payment intent

pub mod availability;
pub mod entities;
pub mod repositories;
