//! Hotel listing entity and search model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hotel listing owned by a user.
///
/// Serializable so the public read path can keep it in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub hotel_type: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub facilities: Vec<String>,
    pub price_per_night_cents: i64,
    pub star_rating: i16,
    pub image_urls: Vec<String>,
    pub last_updated: DateTime<Utc>,
    /// Ids of the rooms belonging to this hotel.
    pub room_ids: Vec<i64>,
}

impl Hotel {
    /// Returns true if `user_id` owns this listing.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for creating a hotel.
#[derive(Debug, Clone)]
pub struct NewHotel {
    pub user_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub hotel_type: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub facilities: Vec<String>,
    pub price_per_night_cents: i64,
    pub star_rating: i16,
    pub image_urls: Vec<String>,
}

/// Partial update for a hotel. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct HotelPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub hotel_type: Option<String>,
    pub adult_count: Option<i32>,
    pub child_count: Option<i32>,
    pub facilities: Option<Vec<String>>,
    pub price_per_night_cents: Option<i64>,
    pub star_rating: Option<i16>,
    pub image_urls: Option<Vec<String>>,
}

/// Result ordering for hotel search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotelSort {
    #[default]
    LastUpdated,
    StarRating,
    PriceAsc,
    PriceDesc,
}

impl HotelSort {
    /// Parses the client's `sortOption` value. Unknown values fall back to the default.
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some("starRating") => HotelSort::StarRating,
            Some("pricePerNightAsc") => HotelSort::PriceAsc,
            Some("pricePerNightDesc") => HotelSort::PriceDesc,
            _ => HotelSort::LastUpdated,
        }
    }
}

/// Normalized search criteria.
#[derive(Debug, Clone, Default)]
pub struct HotelSearch {
    pub destination: Option<String>,
    pub adult_count: Option<i32>,
    pub child_count: Option<i32>,
    pub facilities: Vec<String>,
    pub types: Vec<String>,
    pub stars: Vec<i16>,
    pub max_price_cents: Option<i64>,
    pub sort: HotelSort,
    pub page: i64,
    pub page_size: i64,
}

/// Highest page number a search may ask for.
pub const MAX_SEARCH_PAGE: i64 = 10_000;

impl HotelSearch {
    /// Rows to skip for the current page. Out-of-range pages are clamped to
    /// `1..=MAX_SEARCH_PAGE`.
    pub fn offset(&self) -> i64 {
        (self.page.clamp(1, MAX_SEARCH_PAGE) - 1).saturating_mul(self.page_size.max(0))
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct HotelPage {
    pub items: Vec<Hotel>,
    pub total: i64,
}
