//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters. Multi-table writes run inside a single transaction.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts
//! - [`PgSessionRepository`] - Login sessions
//! - [`PgHotelRepository`] - Hotels and paginated search
//! - [`PgRoomRepository`] - Rooms, room numbers and unavailable dates
//! - [`PgBookingRepository`] - Bookings and the dates they block

pub mod pg_booking_repository;
pub mod pg_hotel_repository;
pub mod pg_room_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_booking_repository::PgBookingRepository;
pub use pg_hotel_repository::PgHotelRepository;
pub use pg_room_repository::PgRoomRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
