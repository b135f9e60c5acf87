//! Business logic services for the application layer.

pub mod auth_service;
pub mod booking_service;
pub mod hotel_service;
pub mod room_service;
pub mod user_service;

pub use auth_service::{AuthService, CurrentUser, IssuedSession};
pub use booking_service::{BookingService, PaymentHandoff, ReservationRequest};
pub use hotel_service::HotelService;
pub use room_service::RoomService;
pub use user_service::{UserInput, UserService, UserUpdate};
