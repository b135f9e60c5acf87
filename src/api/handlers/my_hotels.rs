//! Handlers for hotels managed by the signed-in owner.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::booking::BookingResponse;
use crate::api::dto::hotel::{HotelForm, HotelResponse};
use crate::api::form::MultipartForm;
use crate::application::services::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/my-hotels`
pub async fn list_my_hotels_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<HotelResponse>>, AppError> {
    let hotels = state.hotel_service.list_mine(&actor).await?;
    Ok(Json(hotels.into_iter().map(HotelResponse::from).collect()))
}

/// Creates a hotel from a multipart form.
///
/// # Endpoint
///
/// `POST /api/my-hotels`
///
/// Text fields: `name`, `city`, `country`, `description`, `type`,
/// `adult_count`, `child_count`, `facilities` (repeated),
/// `price_per_night_cents`, `star_rating`. Image files in any file part,
/// at most `MAX_IMAGES_PER_HOTEL`.
///
/// # Errors
///
/// Returns 400 if validation fails or an upload is not an image.
pub async fn create_my_hotel_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<HotelResponse>), AppError> {
    let mut form = MultipartForm::collect(multipart, state.max_images_per_hotel).await?;
    let hotel_form = HotelForm::from_form(&form)?;

    let image_urls = form.store_images(state.image_store.as_ref()).await?;
    let hotel = state
        .hotel_service
        .create(&actor, hotel_form.into_new_hotel(image_urls))
        .await?;

    Ok((StatusCode::CREATED, Json(hotel.into())))
}

/// `GET /api/my-hotels/{id}`
pub async fn get_my_hotel_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<HotelResponse>, AppError> {
    let hotel = state.hotel_service.get_managed(&actor, id).await?;
    Ok(Json(hotel.into()))
}

/// Replaces a hotel's fields from a multipart form.
///
/// # Endpoint
///
/// `PUT /api/my-hotels/{id}`
///
/// Same fields as creation. Existing images listed in `image_urls` are
/// kept, others are dropped, and new uploads are appended.
pub async fn update_my_hotel_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<HotelResponse>, AppError> {
    let current = state.hotel_service.get_managed(&actor, id).await?;

    let mut form = MultipartForm::collect(multipart, state.max_images_per_hotel).await?;
    let hotel_form = HotelForm::from_form(&form)?;

    let kept = hotel_form
        .image_urls
        .iter()
        .filter(|url| current.image_urls.contains(url))
        .count();
    if kept + form.images.len() > state.max_images_per_hotel {
        return Err(AppError::bad_request(
            "Too many images",
            json!({ "limit": state.max_images_per_hotel }),
        ));
    }

    let uploaded = form.store_images(state.image_store.as_ref()).await?;
    let patch = hotel_form.into_patch(&current, uploaded);
    let hotel = state.hotel_service.update(&actor, id, patch).await?;

    Ok(Json(hotel.into()))
}

/// `DELETE /api/my-hotels/{id}`
pub async fn delete_my_hotel_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.hotel_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/my-hotels/{id}/bookings`
pub async fn hotel_bookings_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.booking_service.hotel_bookings(&actor, id).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}
