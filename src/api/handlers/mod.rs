//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod bookings;
pub mod health;
pub mod hotels;
pub mod my_hotels;
pub mod rooms;
pub mod users;

pub use auth::{
    login_handler, logout_handler, me_handler, register_handler, validate_token_handler,
};
pub use bookings::{
    availability_handler, confirm_booking_handler, my_bookings_handler, payment_intent_handler,
    quote_handler,
};
pub use health::health_handler;
pub use hotels::{
    get_hotel_handler, hotel_rooms_handler, list_hotels_handler, search_hotels_handler,
};
pub use my_hotels::{
    create_my_hotel_handler, delete_my_hotel_handler, get_my_hotel_handler,
    hotel_bookings_handler, list_my_hotels_handler, update_my_hotel_handler,
};
pub use rooms::{
    add_unavailable_dates_handler, create_room_handler, delete_room_handler, get_room_handler,
    list_my_rooms_handler, update_room_handler,
};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
