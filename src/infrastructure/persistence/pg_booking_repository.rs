//! PostgreSQL implementation of booking repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{BookedRoom, Booking, NewBooking};
use crate::domain::repositories::BookingRepository;
use crate::error::AppError;
use serde_json::json;

const BOOKING_COLUMNS: &str = "id, hotel_id, user_id, first_name, last_name, email, adult_count, \
     child_count, check_in, check_out, total_cost_cents, payment_intent_id, created_at";

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    hotel_id: i64,
    user_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    adult_count: i32,
    child_count: i32,
    check_in: NaiveDate,
    check_out: NaiveDate,
    total_cost_cents: i64,
    payment_intent_id: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct BookedRoomRow {
    booking_id: i64,
    room_id: i64,
    room_number_id: i64,
    room_number: i32,
    title: String,
    price_cents: i64,
}

/// PostgreSQL repository for confirmed bookings.
pub struct PgBookingRepository {
    pool: Arc<PgPool>,
}

impl PgBookingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn attach_rooms(&self, rows: Vec<BookingRow>) -> Result<Vec<Booking>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let rooms = sqlx::query_as::<_, BookedRoomRow>(
            r#"
            SELECT booking_id, room_id, room_number_id, room_number, title, price_cents
            FROM booking_rooms
            WHERE booking_id = ANY($1)
            ORDER BY booking_id, room_id, room_number
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_booking: HashMap<i64, Vec<BookedRoom>> = HashMap::new();
        for r in rooms {
            by_booking.entry(r.booking_id).or_default().push(BookedRoom {
                room_id: r.room_id,
                room_number_id: r.room_number_id,
                room_number: r.room_number,
                title: r.title,
                price_cents: r.price_cents,
            });
        }

        Ok(rows
            .into_iter()
            .map(|b| Booking {
                rooms: by_booking.remove(&b.id).unwrap_or_default(),
                id: b.id,
                hotel_id: b.hotel_id,
                user_id: b.user_id,
                first_name: b.first_name,
                last_name: b.last_name,
                email: b.email,
                adult_count: b.adult_count,
                child_count: b.child_count,
                check_in: b.check_in,
                check_out: b.check_out,
                total_cost_cents: b.total_cost_cents,
                payment_intent_id: b.payment_intent_id,
                created_at: b.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, new_booking: NewBooking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO bookings (hotel_id, user_id, first_name, last_name, email, adult_count, \
                                   child_count, check_in, check_out, total_cost_cents, payment_intent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {BOOKING_COLUMNS}"
        );

        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(new_booking.hotel_id)
            .bind(new_booking.user_id)
            .bind(&new_booking.first_name)
            .bind(&new_booking.last_name)
            .bind(&new_booking.email)
            .bind(new_booking.adult_count)
            .bind(new_booking.child_count)
            .bind(new_booking.check_in)
            .bind(new_booking.check_out)
            .bind(new_booking.total_cost_cents)
            .bind(&new_booking.payment_intent_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict { .. } => AppError::conflict(
                    "Payment intent already used for a booking",
                    json!({ "payment_intent_id": new_booking.payment_intent_id }),
                ),
                other => other,
            })?;

        let room_ids: Vec<i64> = new_booking.rooms.iter().map(|r| r.room_id).collect();
        let number_ids: Vec<i64> = new_booking.rooms.iter().map(|r| r.room_number_id).collect();
        let numbers: Vec<i32> = new_booking.rooms.iter().map(|r| r.room_number).collect();
        let titles: Vec<String> = new_booking.rooms.iter().map(|r| r.title.clone()).collect();
        let prices: Vec<i64> = new_booking.rooms.iter().map(|r| r.price_cents).collect();

        sqlx::query(
            r#"
            INSERT INTO booking_rooms (booking_id, room_id, room_number_id, room_number, title, price_cents)
            SELECT $1, * FROM UNNEST($2::BIGINT[], $3::BIGINT[], $4::INTEGER[], $5::TEXT[], $6::BIGINT[])
            "#,
        )
        .bind(row.id)
        .bind(&room_ids)
        .bind(&number_ids)
        .bind(&numbers)
        .bind(&titles)
        .bind(&prices)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO room_unavailable_dates (room_number_id, day)
            SELECT rn, d FROM UNNEST($1::BIGINT[]) AS rn CROSS JOIN UNNEST($2::DATE[]) AS d
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&number_ids)
        .bind(&new_booking.blocked_dates)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Booking {
            id: row.id,
            hotel_id: row.hotel_id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            adult_count: row.adult_count,
            child_count: row.child_count,
            check_in: row.check_in,
            check_out: row.check_out,
            total_cost_cents: row.total_cost_cents,
            payment_intent_id: row.payment_intent_id,
            rooms: new_booking.rooms,
            created_at: row.created_at,
        })
    }

    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE payment_intent_id = $1");

        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(payment_intent_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(self.attach_rooms(row.into_iter().collect()).await?.pop())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, AppError> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.attach_rooms(rows).await
    }

    async fn list_by_hotel(&self, hotel_id: i64) -> Result<Vec<Booking>, AppError> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE hotel_id = $1 ORDER BY check_in, id"
        );

        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(hotel_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.attach_rooms(rows).await
    }
}
