//! PostgreSQL implementation of hotel repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Hotel, HotelPage, HotelPatch, HotelSearch, HotelSort, NewHotel};
use crate::domain::repositories::HotelRepository;
use crate::error::AppError;
use serde_json::json;

const HOTEL_COLUMNS: &str = "h.id, h.user_id, h.name, h.city, h.country, h.description, \
     h.hotel_type, h.adult_count, h.child_count, h.facilities, h.price_per_night_cents, \
     h.star_rating, h.image_urls, h.last_updated, \
     ARRAY(SELECT r.id FROM rooms r WHERE r.hotel_id = h.id ORDER BY r.id) AS room_ids";

#[derive(sqlx::FromRow)]
struct HotelRow {
    id: i64,
    user_id: i64,
    name: String,
    city: String,
    country: String,
    description: String,
    hotel_type: String,
    adult_count: i32,
    child_count: i32,
    facilities: Vec<String>,
    price_per_night_cents: i64,
    star_rating: i16,
    image_urls: Vec<String>,
    last_updated: DateTime<Utc>,
    room_ids: Vec<i64>,
}

impl From<HotelRow> for Hotel {
    fn from(r: HotelRow) -> Self {
        Hotel {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            city: r.city,
            country: r.country,
            description: r.description,
            hotel_type: r.hotel_type,
            adult_count: r.adult_count,
            child_count: r.child_count,
            facilities: r.facilities,
            price_per_night_cents: r.price_per_night_cents,
            star_rating: r.star_rating,
            image_urls: r.image_urls,
            last_updated: r.last_updated,
            room_ids: r.room_ids,
        }
    }
}

/// Escapes `LIKE` wildcards so the destination is matched literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Appends the `WHERE` clause for `search` to `qb`.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, search: &HotelSearch) {
    qb.push(" WHERE TRUE");

    if let Some(destination) = &search.destination {
        let pattern = like_pattern(destination);
        qb.push(" AND (h.city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR h.country ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(adults) = search.adult_count {
        qb.push(" AND h.adult_count >= ").push_bind(adults);
    }
    if let Some(children) = search.child_count {
        qb.push(" AND h.child_count >= ").push_bind(children);
    }
    if !search.facilities.is_empty() {
        qb.push(" AND h.facilities @> ")
            .push_bind(search.facilities.clone());
    }
    if !search.types.is_empty() {
        qb.push(" AND h.hotel_type = ANY(")
            .push_bind(search.types.clone())
            .push(")");
    }
    if !search.stars.is_empty() {
        qb.push(" AND h.star_rating = ANY(")
            .push_bind(search.stars.clone())
            .push(")");
    }
    if let Some(max_price) = search.max_price_cents {
        qb.push(" AND h.price_per_night_cents <= ")
            .push_bind(max_price);
    }
}

fn order_clause(sort: HotelSort) -> &'static str {
    match sort {
        HotelSort::LastUpdated => " ORDER BY h.last_updated DESC, h.id DESC",
        HotelSort::StarRating => " ORDER BY h.star_rating DESC, h.id",
        HotelSort::PriceAsc => " ORDER BY h.price_per_night_cents ASC, h.id",
        HotelSort::PriceDesc => " ORDER BY h.price_per_night_cents DESC, h.id",
    }
}

/// PostgreSQL repository for hotel listings.
///
/// Room ids are derived from the `rooms` table on every read.
pub struct PgHotelRepository {
    pool: Arc<PgPool>,
}

impl PgHotelRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn create(&self, new_hotel: NewHotel) -> Result<Hotel, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO hotels (user_id, name, city, country, description, hotel_type,
                                adult_count, child_count, facilities, price_per_night_cents,
                                star_rating, image_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(new_hotel.user_id)
        .bind(new_hotel.name)
        .bind(new_hotel.city)
        .bind(new_hotel.country)
        .bind(new_hotel.description)
        .bind(new_hotel.hotel_type)
        .bind(new_hotel.adult_count)
        .bind(new_hotel.child_count)
        .bind(new_hotel.facilities)
        .bind(new_hotel.price_per_night_cents)
        .bind(new_hotel.star_rating)
        .bind(new_hotel.image_urls)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::internal("Hotel vanished after insert", json!({ "id": id }))
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Hotel>, AppError> {
        let sql = format!("SELECT {HOTEL_COLUMNS} FROM hotels h WHERE h.id = $1");

        let row = sqlx::query_as::<_, HotelRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, owner_id: Option<i64>) -> Result<Vec<Hotel>, AppError> {
        let sql = format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels h \
             WHERE ($1::BIGINT IS NULL OR h.user_id = $1) \
             ORDER BY h.last_updated DESC, h.id DESC"
        );

        let rows = sqlx::query_as::<_, HotelRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, search: &HotelSearch) -> Result<HotelPage, AppError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hotels h");
        push_filters(&mut count_qb, search);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {HOTEL_COLUMNS} FROM hotels h"));
        push_filters(&mut qb, search);
        qb.push(order_clause(search.sort));
        qb.push(" LIMIT ")
            .push_bind(search.page_size)
            .push(" OFFSET ")
            .push_bind(search.offset());

        let rows = qb
            .build_query_as::<HotelRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(HotelPage {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn update(&self, id: i64, patch: HotelPatch) -> Result<Hotel, AppError> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE hotels SET
                name                  = COALESCE($2, name),
                city                  = COALESCE($3, city),
                country               = COALESCE($4, country),
                description           = COALESCE($5, description),
                hotel_type            = COALESCE($6, hotel_type),
                adult_count           = COALESCE($7, adult_count),
                child_count           = COALESCE($8, child_count),
                facilities            = COALESCE($9, facilities),
                price_per_night_cents = COALESCE($10, price_per_night_cents),
                star_rating           = COALESCE($11, star_rating),
                image_urls            = COALESCE($12, image_urls),
                last_updated          = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.city)
        .bind(patch.country)
        .bind(patch.description)
        .bind(patch.hotel_type)
        .bind(patch.adult_count)
        .bind(patch.child_count)
        .bind(patch.facilities)
        .bind(patch.price_per_night_cents)
        .bind(patch.star_rating)
        .bind(patch.image_urls)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if updated.is_none() {
            return Err(AppError::not_found("Hotel not found", json!({ "id": id })));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hotel not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hotels")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
