//! Public hotel listing, lookup and search handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::hotel::{HotelResponse, HotelSearchResponse, search_from_query};
use crate::api::dto::room::RoomResponse;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/hotels`: every hotel, most recently updated first.
pub async fn list_hotels_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<HotelResponse>>, AppError> {
    let hotels = state.hotel_service.list_all().await?;
    Ok(Json(hotels.into_iter().map(HotelResponse::from).collect()))
}

/// `GET /api/hotels/{id}`, served from the cache when available.
pub async fn get_hotel_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<HotelResponse>, AppError> {
    let hotel = state.hotel_service.get(id).await?;
    Ok(Json(hotel.into()))
}

/// Searches hotels.
///
/// # Endpoint
///
/// `GET /api/hotels/search`
///
/// # Query Parameters
///
/// - `destination` - substring of city or country, case-insensitive
/// - `adult_count`, `child_count` - minimum capacity
/// - `facilities` - all must be present (repeatable or comma-separated)
/// - `types`, `stars` - any of (repeatable or comma-separated)
/// - `max_price` - nightly price ceiling in cents
/// - `sort_option` - `starRating`, `pricePerNightAsc` or `pricePerNightDesc`
/// - `page` - 1-based, five results per page
///
/// # Response
///
/// ```json
/// { "data": [ ... ], "pagination": { "total": 11, "page": 1, "pages": 3 } }
/// ```
pub async fn search_hotels_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<HotelSearchResponse>, AppError> {
    let search = search_from_query(&pairs)?;
    let page = search.page;
    let result = state.hotel_service.search(search).await?;
    Ok(Json(HotelSearchResponse::new(result, page)))
}

/// `GET /api/hotels/{id}/rooms`
pub async fn hotel_rooms_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomResponse>>, AppError> {
    let rooms = state.room_service.list_for_hotel(id).await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}
