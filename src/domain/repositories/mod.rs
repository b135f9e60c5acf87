//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access. Implementations live in
//! `crate::infrastructure::persistence`; mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts
//! - [`SessionRepository`] - Login sessions
//! - [`HotelRepository`] - Hotel listings and search
//! - [`RoomRepository`] - Rooms, room numbers and unavailable dates
//! - [`BookingRepository`] - Confirmed bookings

pub mod booking_repository;
pub mod hotel_repository;
pub mod room_repository;
pub mod session_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository;
pub use hotel_repository::HotelRepository;
pub use room_repository::RoomRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
#[cfg(test)]
pub use hotel_repository::MockHotelRepository;
#[cfg(test)]
pub use room_repository::MockRoomRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
