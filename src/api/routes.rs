//! API route configuration.
//!
//! Routes are grouped by access level:
//!
//! - [`credential_routes`] - registration and login (public, strictly rate limited)
//! - [`public_routes`] - hotel browsing, availability and quotes
//! - [`protected_routes`] - everything that needs a session, with admin-only
//!   user management behind [`crate::api::middleware::auth::require_admin`]

use crate::api::handlers::{
    add_unavailable_dates_handler, availability_handler, confirm_booking_handler,
    create_my_hotel_handler, create_room_handler, create_user_handler, delete_my_hotel_handler,
    delete_room_handler, delete_user_handler, get_hotel_handler, get_my_hotel_handler,
    get_room_handler, get_user_handler, hotel_bookings_handler, hotel_rooms_handler,
    list_hotels_handler, list_my_hotels_handler, list_my_rooms_handler, list_users_handler,
    login_handler, logout_handler, me_handler, my_bookings_handler, payment_intent_handler,
    quote_handler, register_handler, search_hotels_handler, update_my_hotel_handler,
    update_room_handler, update_user_handler, validate_token_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post, put},
};

/// # Endpoints
///
/// - `POST /users/register` - Create an account and sign in
/// - `POST /auth/login`     - Sign in with email and password
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// # Endpoints
///
/// - `GET  /hotels`                      - All hotels, most recently updated first
/// - `GET  /hotels/search`               - Filtered, sorted, paginated search
/// - `GET  /hotels/{id}`                 - One hotel
/// - `GET  /hotels/{id}/rooms`           - Rooms of a hotel
/// - `GET  /hotels/{id}/availability`    - Free room numbers for a stay
/// - `POST /hotels/{id}/bookings/quote`  - Price a reservation
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(list_hotels_handler))
        .route("/hotels/search", get(search_hotels_handler))
        .route("/hotels/{id}", get(get_hotel_handler))
        .route("/hotels/{id}/rooms", get(hotel_rooms_handler))
        .route("/hotels/{id}/availability", get(availability_handler))
        .route("/hotels/{id}/bookings/quote", post(quote_handler))
}

/// Routes that require a session.
///
/// # Endpoints
///
/// - `GET  /auth/validate-token`                    - Who am I (id only)
/// - `POST /auth/logout`                            - Revoke the session
/// - `GET  /users/me`                               - Own profile
/// - `GET|POST /my-users`                           - List / create users (admin)
/// - `GET|PUT|DELETE /my-users/{id}`                - View / edit (self or admin), delete (admin)
/// - `GET|POST /my-hotels`                          - Own hotels
/// - `GET|PUT|DELETE /my-hotels/{id}`               - Manage one hotel
/// - `GET  /my-hotels/{id}/bookings`                - Bookings of a managed hotel
/// - `GET|POST /my-rooms`                           - Rooms of own hotels
/// - `GET|PUT|DELETE /my-rooms/{id}`                - Manage one room
/// - `PUT  /my-rooms/availability/{room_number_id}` - Block days for a room number
/// - `POST /hotels/{id}/bookings/payment-intent`    - Open a payment intent
/// - `POST /hotels/{id}/bookings`                   - Confirm a paid booking
/// - `GET  /my-bookings`                            - Own bookings
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let admin_only = middleware::from_fn(auth::require_admin);

    Router::new()
        .route("/auth/validate-token", get(validate_token_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/users/me", get(me_handler))
        .route(
            "/my-users",
            get(list_users_handler.layer(admin_only.clone()))
                .post(create_user_handler.layer(admin_only.clone())),
        )
        .route(
            "/my-users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler.layer(admin_only)),
        )
        .route(
            "/my-hotels",
            get(list_my_hotels_handler).post(create_my_hotel_handler),
        )
        .route(
            "/my-hotels/{id}",
            get(get_my_hotel_handler)
                .put(update_my_hotel_handler)
                .delete(delete_my_hotel_handler),
        )
        .route("/my-hotels/{id}/bookings", get(hotel_bookings_handler))
        .route(
            "/my-rooms",
            get(list_my_rooms_handler).post(create_room_handler),
        )
        .route(
            "/my-rooms/{id}",
            get(get_room_handler)
                .put(update_room_handler)
                .delete(delete_room_handler),
        )
        .route(
            "/my-rooms/availability/{room_number_id}",
            put(add_unavailable_dates_handler),
        )
        .route(
            "/hotels/{id}/bookings/payment-intent",
            post(payment_intent_handler),
        )
        .route("/hotels/{id}/bookings", post(confirm_booking_handler))
        .route("/my-bookings", get(my_bookings_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// Every API route without rate limiting; mounted under `/api`.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(credential_routes())
        .merge(public_routes())
        .merge(protected_routes(state))
}
