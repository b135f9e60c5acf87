//! DTOs for hotel listings, owner forms and search.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use crate::api::form::MultipartForm;
use crate::application::services::hotel_service::SEARCH_PAGE_SIZE;
use crate::domain::entities::{
    Hotel, HotelPage, HotelPatch, HotelSearch, HotelSort, MAX_SEARCH_PAGE, NewHotel,
};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct HotelResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    #[serde(rename = "type")]
    pub hotel_type: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub facilities: Vec<String>,
    pub price_per_night_cents: i64,
    pub star_rating: i16,
    pub image_urls: Vec<String>,
    pub room_ids: Vec<i64>,
    pub last_updated: DateTime<Utc>,
}

impl From<Hotel> for HotelResponse {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            user_id: hotel.user_id,
            name: hotel.name,
            city: hotel.city,
            country: hotel.country,
            description: hotel.description,
            hotel_type: hotel.hotel_type,
            adult_count: hotel.adult_count,
            child_count: hotel.child_count,
            facilities: hotel.facilities,
            price_per_night_cents: hotel.price_per_night_cents,
            star_rating: hotel.star_rating,
            image_urls: hotel.image_urls,
            room_ids: hotel.room_ids,
            last_updated: hotel.last_updated,
        }
    }
}

/// Owner form for creating or replacing a hotel.
///
/// `image_urls` lists the already-uploaded images to keep on update.
#[derive(Debug, Validate)]
pub struct HotelForm {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,
    #[validate(length(min = 1, max = 5000, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "Hotel type is required"))]
    pub hotel_type: String,
    #[validate(range(min = 1, message = "At least one adult"))]
    pub adult_count: i32,
    #[validate(range(min = 0))]
    pub child_count: i32,
    #[validate(length(min = 1, message = "Select at least one facility"))]
    pub facilities: Vec<String>,
    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price_per_night_cents: i64,
    #[validate(range(min = 1, max = 5, message = "Star rating must be between 1 and 5"))]
    pub star_rating: i16,
    pub image_urls: Vec<String>,
}

impl HotelForm {
    /// Reads and validates the hotel fields of a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for missing, malformed or invalid fields.
    pub fn from_form(form: &MultipartForm) -> Result<Self, AppError> {
        let hotel = Self {
            name: form.required("name")?,
            city: form.required("city")?,
            country: form.required("country")?,
            description: form.required("description")?,
            hotel_type: form.required("type")?,
            adult_count: form.parse_required("adult_count")?,
            child_count: form.parse("child_count")?.unwrap_or(0),
            facilities: form.list("facilities"),
            price_per_night_cents: form.parse_required("price_per_night_cents")?,
            star_rating: form.parse_required("star_rating")?,
            image_urls: form.list("image_urls"),
        };
        hotel.validate()?;
        Ok(hotel)
    }

    /// New hotel whose images are exactly the fresh uploads.
    pub fn into_new_hotel(self, uploaded: Vec<String>) -> NewHotel {
        NewHotel {
            user_id: 0,
            name: self.name,
            city: self.city,
            country: self.country,
            description: self.description,
            hotel_type: self.hotel_type,
            adult_count: self.adult_count,
            child_count: self.child_count,
            facilities: self.facilities,
            price_per_night_cents: self.price_per_night_cents,
            star_rating: self.star_rating,
            image_urls: uploaded,
        }
    }

    /// Full replacement of a hotel's fields.
    ///
    /// Only listed URLs that the hotel already has survive; fresh uploads are
    /// appended after them.
    pub fn into_patch(self, current: &Hotel, uploaded: Vec<String>) -> HotelPatch {
        let mut image_urls: Vec<String> = self
            .image_urls
            .into_iter()
            .filter(|url| current.image_urls.contains(url))
            .collect();
        image_urls.dedup();
        image_urls.extend(uploaded);

        HotelPatch {
            name: Some(self.name),
            city: Some(self.city),
            country: Some(self.country),
            description: Some(self.description),
            hotel_type: Some(self.hotel_type),
            adult_count: Some(self.adult_count),
            child_count: Some(self.child_count),
            facilities: Some(self.facilities),
            price_per_night_cents: Some(self.price_per_night_cents),
            star_rating: Some(self.star_rating),
            image_urls: Some(image_urls),
        }
    }
}

/// Splits repeated and comma-separated values into one list.
fn multi_values<'a>(pairs: &'a [(String, String)], key: &str) -> impl Iterator<Item = &'a str> {
    let key = key.to_string();
    pairs
        .iter()
        .filter(move |(k, _)| k.trim_end_matches("[]") == key)
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn single_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v.trim())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.parse().map_err(|_| {
        AppError::bad_request(
            "Invalid search parameter",
            json!({ "parameter": key, "value": raw }),
        )
    })
}

/// Builds a [`HotelSearch`] from the raw query pairs of `GET /api/hotels/search`.
///
/// `facilities`, `types` and `stars` may be repeated (`stars=4&stars=5`),
/// use bracket keys (`stars[]=4`) or be comma-separated (`stars=4,5`).
///
/// # Errors
///
/// Returns [`AppError::Validation`] if a numeric parameter does not parse.
pub fn search_from_query(pairs: &[(String, String)]) -> Result<HotelSearch, AppError> {
    let number = |key: &str| -> Result<Option<i64>, AppError> {
        single_value(pairs, key)
            .map(|raw| parse_number::<i64>(key, raw))
            .transpose()
    };

    let stars = multi_values(pairs, "stars")
        .map(|raw| parse_number::<i16>("stars", raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HotelSearch {
        destination: single_value(pairs, "destination").map(str::to_string),
        adult_count: single_value(pairs, "adult_count")
            .map(|raw| parse_number::<i32>("adult_count", raw))
            .transpose()?,
        child_count: single_value(pairs, "child_count")
            .map(|raw| parse_number::<i32>("child_count", raw))
            .transpose()?,
        facilities: multi_values(pairs, "facilities").map(str::to_string).collect(),
        types: multi_values(pairs, "types").map(str::to_string).collect(),
        stars,
        max_price_cents: number("max_price")?,
        sort: HotelSort::from_option(single_value(pairs, "sort_option")),
        page: number("page")?.unwrap_or(1).clamp(1, MAX_SEARCH_PAGE),
        page_size: SEARCH_PAGE_SIZE,
    })
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct HotelSearchResponse {
    pub data: Vec<HotelResponse>,
    pub pagination: Pagination,
}

impl HotelSearchResponse {
    pub fn new(page: HotelPage, page_number: i64) -> Self {
        let pages = (page.total + SEARCH_PAGE_SIZE - 1) / SEARCH_PAGE_SIZE;
        Self {
            data: page.items.into_iter().map(HotelResponse::from).collect(),
            pagination: Pagination {
                total: page.total,
                page: page_number.max(1),
                pages,
            },
        }
    }
}
