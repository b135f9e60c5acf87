//! PostgreSQL implementation of room repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{NewRoom, Room, RoomNumber, RoomPatch};
use crate::domain::repositories::RoomRepository;
use crate::error::AppError;
use serde_json::json;

const ROOM_COLUMNS: &str =
    "r.id, r.hotel_id, r.title, r.price_cents, r.max_people, r.description, r.created_at, r.updated_at";

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: i64,
    hotel_id: i64,
    title: String,
    price_cents: i64,
    max_people: i32,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct RoomNumberRow {
    id: i64,
    room_id: i64,
    number: i32,
    unavailable_dates: Vec<NaiveDate>,
}

impl From<RoomNumberRow> for RoomNumber {
    fn from(r: RoomNumberRow) -> Self {
        RoomNumber {
            id: r.id,
            number: r.number,
            unavailable_dates: r.unavailable_dates,
        }
    }
}

fn duplicate_number_error(e: sqlx::Error) -> AppError {
    match AppError::from(e) {
        AppError::Conflict { .. } => {
            AppError::conflict("Room number already exists for this room", json!({}))
        }
        other => other,
    }
}

/// PostgreSQL repository for rooms.
///
/// A room is stored across `rooms`, `room_numbers` and
/// `room_unavailable_dates`; reads assemble the three back into a [`Room`].
pub struct PgRoomRepository {
    pool: Arc<PgPool>,
}

impl PgRoomRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads room numbers (with sorted unavailable dates) for `rows` and builds rooms.
    async fn assemble(&self, rows: Vec<RoomRow>) -> Result<Vec<Room>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let numbers = sqlx::query_as::<_, RoomNumberRow>(
            r#"
            SELECT rn.id, rn.room_id, rn.number,
                   ARRAY(SELECT d.day FROM room_unavailable_dates d
                         WHERE d.room_number_id = rn.id ORDER BY d.day) AS unavailable_dates
            FROM room_numbers rn
            WHERE rn.room_id = ANY($1)
            ORDER BY rn.room_id, rn.number
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_room: HashMap<i64, Vec<RoomNumber>> = HashMap::new();
        for n in numbers {
            by_room.entry(n.room_id).or_default().push(n.into());
        }

        Ok(rows
            .into_iter()
            .map(|r| Room {
                room_numbers: by_room.remove(&r.id).unwrap_or_default(),
                id: r.id,
                hotel_id: r.hotel_id,
                title: r.title,
                price_cents: r.price_cents,
                max_people: r.max_people,
                description: r.description,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect())
    }

    async fn fetch_one_room(&self, sql: &str, id: i64) -> Result<Option<Room>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(self.assemble(row.into_iter().collect()).await?.pop())
    }

    async fn insert_numbers(
        tx: &mut Transaction<'_, Postgres>,
        room_id: i64,
        numbers: &[i32],
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO room_numbers (room_id, number)
            SELECT $1, n FROM UNNEST($2::INTEGER[]) AS n
            "#,
        )
        .bind(room_id)
        .bind(numbers)
        .execute(&mut **tx)
        .await
        .map_err(duplicate_number_error)?;

        Ok(())
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn create(&self, new_room: NewRoom) -> Result<Room, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO rooms (hotel_id, title, price_cents, max_people, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new_room.hotel_id)
        .bind(&new_room.title)
        .bind(new_room.price_cents)
        .bind(new_room.max_people)
        .bind(&new_room.description)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_numbers(&mut tx, id, &new_room.room_numbers).await?;
        sqlx::query("UPDATE hotels SET last_updated = NOW() WHERE id = $1")
            .bind(new_room.hotel_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Room vanished after insert", json!({ "id": id })))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError> {
        let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms r WHERE r.id = $1");
        self.fetch_one_room(&sql, id).await
    }

    async fn find_by_room_number(&self, room_number_id: i64) -> Result<Option<Room>, AppError> {
        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r \
             JOIN room_numbers rn ON rn.room_id = r.id \
             WHERE rn.id = $1"
        );
        self.fetch_one_room(&sql, room_number_id).await
    }

    async fn list_by_hotel(&self, hotel_id: i64) -> Result<Vec<Room>, AppError> {
        let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms r WHERE r.hotel_id = $1 ORDER BY r.id");

        let rows = sqlx::query_as::<_, RoomRow>(&sql)
            .bind(hotel_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.assemble(rows).await
    }

    async fn list(&self, owner_id: Option<i64>) -> Result<Vec<Room>, AppError> {
        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r \
             JOIN hotels h ON h.id = r.hotel_id \
             WHERE ($1::BIGINT IS NULL OR h.user_id = $1) \
             ORDER BY r.id"
        );

        let rows = sqlx::query_as::<_, RoomRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.assemble(rows).await
    }

    async fn update(&self, id: i64, patch: RoomPatch) -> Result<Room, AppError> {
        let mut tx = self.pool.begin().await?;

        let hotel_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE rooms SET
                title       = COALESCE($2, title),
                price_cents = COALESCE($3, price_cents),
                max_people  = COALESCE($4, max_people),
                description = COALESCE($5, description),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING hotel_id
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.price_cents)
        .bind(patch.max_people)
        .bind(patch.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(hotel_id) = hotel_id else {
            return Err(AppError::not_found("Room not found", json!({ "id": id })));
        };

        if let Some(numbers) = patch.room_numbers {
            sqlx::query("DELETE FROM room_numbers WHERE room_id = $1 AND NOT (number = ANY($2))")
                .bind(id)
                .bind(&numbers)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO room_numbers (room_id, number)
                SELECT $1, n FROM UNNEST($2::INTEGER[]) AS n
                ON CONFLICT (room_id, number) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(&numbers)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE hotels SET last_updated = NOW() WHERE id = $1")
            .bind(hotel_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Room not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_unavailable_dates(
        &self,
        room_number_id: i64,
        dates: Vec<NaiveDate>,
    ) -> Result<RoomNumber, AppError> {
        sqlx::query(
            r#"
            INSERT INTO room_unavailable_dates (room_number_id, day)
            SELECT rn.id, d
            FROM room_numbers rn CROSS JOIN UNNEST($2::DATE[]) AS d
            WHERE rn.id = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(room_number_id)
        .bind(&dates)
        .execute(self.pool.as_ref())
        .await?;

        let row = sqlx::query_as::<_, RoomNumberRow>(
            r#"
            SELECT rn.id, rn.room_id, rn.number,
                   ARRAY(SELECT d.day FROM room_unavailable_dates d
                         WHERE d.room_number_id = rn.id ORDER BY d.day) AS unavailable_dates
            FROM room_numbers rn
            WHERE rn.id = $1
            "#,
        )
        .bind(room_number_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into).ok_or_else(|| {
            AppError::not_found(
                "Room number not found",
                json!({ "room_number_id": room_number_id }),
            )
        })
    }
}
