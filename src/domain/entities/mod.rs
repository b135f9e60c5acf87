//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Creation and partial-update inputs are
//! separate structs:
//! - `NewUser`, `NewHotel`, `NewRoom`, `NewBooking` - for creating records
//! - `UserPatch`, `HotelPatch`, `RoomPatch` - for partial updates

pub mod booking;
pub mod hotel;
pub mod room;
pub mod session;
pub mod user;

pub use booking::{BookedRoom, Booking, NewBooking};
pub use hotel::{Hotel, HotelPage, HotelPatch, HotelSearch, HotelSort, MAX_SEARCH_PAGE, NewHotel};
pub use room::{NewRoom, Room, RoomNumber, RoomPatch};
pub use session::Session;
pub use user::{NewUser, User, UserPatch};
