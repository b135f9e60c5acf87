//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Password login and session tokens
//! - [`services::user_service::UserService`] - User accounts
//! - [`services::hotel_service::HotelService`] - Hotel listings and search
//! - [`services::room_service::RoomService`] - Rooms and unavailable dates
//! - [`services::booking_service::BookingService`] - Availability, payment and bookings

pub mod services;
