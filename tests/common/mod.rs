#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use hotel_booking::domain::entities::{
    Booking, Hotel, HotelPage, HotelPatch, HotelSearch, HotelSort, NewBooking, NewHotel, NewRoom,
    NewUser, Room, RoomNumber, RoomPatch, Session, User, UserPatch,
};
use hotel_booking::domain::repositories::{
    BookingRepository, HotelRepository, RoomRepository, SessionRepository, UserRepository,
};
use hotel_booking::error::AppError;
use hotel_booking::infrastructure::cache::NullCache;
use hotel_booking::infrastructure::payments::{OfflinePaymentProvider, PaymentProvider};
use hotel_booking::infrastructure::storage::{ImageStore, StorageError, UploadedImage};
use hotel_booking::state::{AppState, Repositories, Settings};
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    sessions: Vec<Session>,
    hotels: Vec<Hotel>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
}

impl Tables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn hotel_with_rooms(&self, hotel: &Hotel) -> Hotel {
        let mut hotel = hotel.clone();
        hotel.room_ids = self
            .rooms
            .iter()
            .filter(|r| r.hotel_id == hotel.id)
            .map(|r| r.id)
            .collect();
        hotel
    }

    fn touch_hotel(&mut self, hotel_id: i64) {
        if let Some(h) = self.hotels.iter_mut().find(|h| h.id == hotel_id) {
            h.last_updated = Utc::now();
        }
    }
}

/// In-memory store implementing every repository trait.
#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Email already registered", json!({})));
        }
        let now = Utc::now();
        let user = User {
            id: t.id(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            country: new_user.country,
            city: new_user.city,
            phone: new_user.phone,
            image_url: new_user.image_url,
            is_admin: new_user.is_admin,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock().users.clone())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let mut t = self.lock();
        if let Some(email) = &patch.email {
            if t.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::conflict("Email already registered", json!({})));
            }
        }
        let user = t
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;

        if let Some(v) = patch.email {
            user.email = v;
        }
        if let Some(v) = patch.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = patch.first_name {
            user.first_name = v;
        }
        if let Some(v) = patch.last_name {
            user.last_name = v;
        }
        if patch.country.is_some() {
            user.country = patch.country;
        }
        if patch.city.is_some() {
            user.city = patch.city;
        }
        if patch.phone.is_some() {
            user.phone = patch.phone;
        }
        if patch.image_url.is_some() {
            user.image_url = patch.image_url;
        }
        if let Some(v) = patch.is_admin {
            user.is_admin = v;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.lock();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        t.sessions.retain(|s| s.user_id != id);
        Ok(t.users.len() < before)
    }
}

#[async_trait]
impl SessionRepository for MemoryDb {
    async fn create(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut t = self.lock();
        let session = Session {
            id: t.id(),
            user_id,
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            expires_at,
            revoked_at: None,
        };
        t.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_active(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        let now = Utc::now();
        Ok(self
            .lock()
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash && s.is_active_at(now))
            .cloned())
    }

    async fn touch(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError> {
        let mut t = self.lock();
        match t
            .sessions
            .iter_mut()
            .find(|s| s.token_hash == token_hash && s.revoked_at.is_none())
        {
            Some(session) => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl HotelRepository for MemoryDb {
    async fn create(&self, new_hotel: NewHotel) -> Result<Hotel, AppError> {
        let mut t = self.lock();
        let hotel = Hotel {
            id: t.id(),
            user_id: new_hotel.user_id,
            name: new_hotel.name,
            city: new_hotel.city,
            country: new_hotel.country,
            description: new_hotel.description,
            hotel_type: new_hotel.hotel_type,
            adult_count: new_hotel.adult_count,
            child_count: new_hotel.child_count,
            facilities: new_hotel.facilities,
            price_per_night_cents: new_hotel.price_per_night_cents,
            star_rating: new_hotel.star_rating,
            image_urls: new_hotel.image_urls,
            last_updated: Utc::now(),
            room_ids: vec![],
        };
        t.hotels.push(hotel.clone());
        Ok(hotel)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Hotel>, AppError> {
        let t = self.lock();
        Ok(t.hotels
            .iter()
            .find(|h| h.id == id)
            .map(|h| t.hotel_with_rooms(h)))
    }

    async fn list(&self, owner_id: Option<i64>) -> Result<Vec<Hotel>, AppError> {
        let t = self.lock();
        let mut hotels: Vec<Hotel> = t
            .hotels
            .iter()
            .filter(|h| owner_id.is_none_or(|owner| h.user_id == owner))
            .map(|h| t.hotel_with_rooms(h))
            .collect();
        hotels.sort_by(|a, b| (b.last_updated, b.id).cmp(&(a.last_updated, a.id)));
        Ok(hotels)
    }

    async fn search(&self, search: &HotelSearch) -> Result<HotelPage, AppError> {
        let t = self.lock();
        let mut hotels: Vec<Hotel> = t
            .hotels
            .iter()
            .filter(|h| hotel_matches(search, h))
            .map(|h| t.hotel_with_rooms(h))
            .collect();

        match search.sort {
            HotelSort::LastUpdated => {
                hotels.sort_by(|a, b| (b.last_updated, b.id).cmp(&(a.last_updated, a.id)))
            }
            HotelSort::StarRating => {
                hotels.sort_by(|a, b| b.star_rating.cmp(&a.star_rating).then(a.id.cmp(&b.id)))
            }
            HotelSort::PriceAsc => hotels.sort_by_key(|h| (h.price_per_night_cents, h.id)),
            HotelSort::PriceDesc => hotels.sort_by(|a, b| {
                b.price_per_night_cents
                    .cmp(&a.price_per_night_cents)
                    .then(a.id.cmp(&b.id))
            }),
        }

        let total = hotels.len() as i64;
        let items = hotels
            .into_iter()
            .skip(search.offset().max(0) as usize)
            .take(search.page_size as usize)
            .collect();
        Ok(HotelPage { items, total })
    }

    async fn update(&self, id: i64, patch: HotelPatch) -> Result<Hotel, AppError> {
        let mut t = self.lock();
        let hotel = t
            .hotels
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| AppError::not_found("Hotel not found", json!({ "id": id })))?;

        if let Some(v) = patch.name {
            hotel.name = v;
        }
        if let Some(v) = patch.city {
            hotel.city = v;
        }
        if let Some(v) = patch.country {
            hotel.country = v;
        }
        if let Some(v) = patch.description {
            hotel.description = v;
        }
        if let Some(v) = patch.hotel_type {
            hotel.hotel_type = v;
        }
        if let Some(v) = patch.adult_count {
            hotel.adult_count = v;
        }
        if let Some(v) = patch.child_count {
            hotel.child_count = v;
        }
        if let Some(v) = patch.facilities {
            hotel.facilities = v;
        }
        if let Some(v) = patch.price_per_night_cents {
            hotel.price_per_night_cents = v;
        }
        if let Some(v) = patch.star_rating {
            hotel.star_rating = v;
        }
        if let Some(v) = patch.image_urls {
            hotel.image_urls = v;
        }
        hotel.last_updated = Utc::now();

        let hotel = hotel.clone();
        Ok(t.hotel_with_rooms(&hotel))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.lock();
        let before = t.hotels.len();
        t.hotels.retain(|h| h.id != id);
        t.rooms.retain(|r| r.hotel_id != id);
        t.bookings.retain(|b| b.hotel_id != id);
        Ok(t.hotels.len() < before)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock().hotels.len() as i64)
    }
}

fn numbered(t: &mut Tables, numbers: &[i32]) -> Result<Vec<RoomNumber>, AppError> {
    let unique: BTreeSet<i32> = numbers.iter().copied().collect();
    if unique.len() != numbers.len() {
        return Err(AppError::conflict("Room number repeated", json!({})));
    }
    Ok(unique
        .into_iter()
        .map(|number| RoomNumber {
            id: t.id(),
            number,
            unavailable_dates: vec![],
        })
        .collect())
}

#[async_trait]
impl RoomRepository for MemoryDb {
    async fn create(&self, new_room: NewRoom) -> Result<Room, AppError> {
        let mut t = self.lock();
        let room_numbers = numbered(&mut t, &new_room.room_numbers)?;
        let now = Utc::now();
        let room = Room {
            id: t.id(),
            hotel_id: new_room.hotel_id,
            title: new_room.title,
            price_cents: new_room.price_cents,
            max_people: new_room.max_people,
            description: new_room.description,
            room_numbers,
            created_at: now,
            updated_at: now,
        };
        t.rooms.push(room.clone());
        t.touch_hotel(room.hotel_id);
        Ok(room)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError> {
        Ok(self.lock().rooms.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_room_number(&self, room_number_id: i64) -> Result<Option<Room>, AppError> {
        Ok(self
            .lock()
            .rooms
            .iter()
            .find(|r| r.room_numbers.iter().any(|rn| rn.id == room_number_id))
            .cloned())
    }

    async fn list_by_hotel(&self, hotel_id: i64) -> Result<Vec<Room>, AppError> {
        Ok(self
            .lock()
            .rooms
            .iter()
            .filter(|r| r.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn list(&self, owner_id: Option<i64>) -> Result<Vec<Room>, AppError> {
        let t = self.lock();
        Ok(t.rooms
            .iter()
            .filter(|r| {
                owner_id.is_none_or(|owner| {
                    t.hotels
                        .iter()
                        .any(|h| h.id == r.hotel_id && h.user_id == owner)
                })
            })
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: RoomPatch) -> Result<Room, AppError> {
        let mut t = self.lock();
        let fresh = match &patch.room_numbers {
            Some(numbers) => {
                let existing: Vec<i32> = t
                    .rooms
                    .iter()
                    .find(|r| r.id == id)
                    .map(|r| r.room_numbers.iter().map(|rn| rn.number).collect())
                    .unwrap_or_default();
                let added: Vec<i32> = numbers
                    .iter()
                    .copied()
                    .filter(|n| !existing.contains(n))
                    .collect();
                Some(numbered(&mut t, &added)?)
            }
            None => None,
        };

        let room = t
            .rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Room not found", json!({ "id": id })))?;

        if let Some(v) = patch.title {
            room.title = v;
        }
        if let Some(v) = patch.price_cents {
            room.price_cents = v;
        }
        if let Some(v) = patch.max_people {
            room.max_people = v;
        }
        if let Some(v) = patch.description {
            room.description = v;
        }
        if let (Some(numbers), Some(fresh)) = (patch.room_numbers, fresh) {
            room.room_numbers.retain(|rn| numbers.contains(&rn.number));
            room.room_numbers.extend(fresh);
            room.room_numbers.sort_by_key(|rn| rn.number);
        }
        room.updated_at = Utc::now();
        Ok(room.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.lock();
        let before = t.rooms.len();
        t.rooms.retain(|r| r.id != id);
        Ok(t.rooms.len() < before)
    }

    async fn add_unavailable_dates(
        &self,
        room_number_id: i64,
        dates: Vec<NaiveDate>,
    ) -> Result<RoomNumber, AppError> {
        let mut t = self.lock();
        let room_number = t
            .rooms
            .iter_mut()
            .flat_map(|r| r.room_numbers.iter_mut())
            .find(|rn| rn.id == room_number_id)
            .ok_or_else(|| {
                AppError::not_found("Room number not found", json!({ "id": room_number_id }))
            })?;

        let merged: BTreeSet<NaiveDate> = room_number
            .unavailable_dates
            .iter()
            .copied()
            .chain(dates)
            .collect();
        room_number.unavailable_dates = merged.into_iter().collect();
        Ok(room_number.clone())
    }
}

#[async_trait]
impl BookingRepository for MemoryDb {
    async fn create(&self, new_booking: NewBooking) -> Result<Booking, AppError> {
        let mut t = self.lock();
        if t
            .bookings
            .iter()
            .any(|b| b.payment_intent_id == new_booking.payment_intent_id)
        {
            return Err(AppError::conflict(
                "Payment intent already used for a booking",
                json!({}),
            ));
        }

        let blocked: HashMap<i64, &[NaiveDate]> = new_booking
            .rooms
            .iter()
            .map(|r| (r.room_number_id, new_booking.blocked_dates.as_slice()))
            .collect();
        for rn in t.rooms.iter_mut().flat_map(|r| r.room_numbers.iter_mut()) {
            if let Some(days) = blocked.get(&rn.id) {
                let merged: BTreeSet<NaiveDate> = rn
                    .unavailable_dates
                    .iter()
                    .chain(days.iter())
                    .copied()
                    .collect();
                rn.unavailable_dates = merged.into_iter().collect();
            }
        }

        let booking = Booking {
            id: t.id(),
            hotel_id: new_booking.hotel_id,
            user_id: new_booking.user_id,
            first_name: new_booking.first_name,
            last_name: new_booking.last_name,
            email: new_booking.email,
            adult_count: new_booking.adult_count,
            child_count: new_booking.child_count,
            check_in: new_booking.check_in,
            check_out: new_booking.check_out,
            total_cost_cents: new_booking.total_cost_cents,
            payment_intent_id: new_booking.payment_intent_id,
            rooms: new_booking.rooms,
            created_at: Utc::now(),
        };
        t.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<Booking>, AppError> {
        Ok(self
            .lock()
            .bookings
            .iter()
            .find(|b| b.payment_intent_id == payment_intent_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, AppError> {
        let mut bookings: Vec<Booking> = self
            .lock()
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(bookings)
    }

    async fn list_by_hotel(&self, hotel_id: i64) -> Result<Vec<Booking>, AppError> {
        let mut bookings: Vec<Booking> = self
            .lock()
            .bookings
            .iter()
            .filter(|b| b.hotel_id == hotel_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.check_in, b.id));
        Ok(bookings)
    }
}

/// Image store that hands out predictable URLs without touching disk.
#[derive(Default)]
pub struct MemoryImageStore {
    stored: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn store(&self, image: UploadedImage) -> Result<String, StorageError> {
        let mut stored = self.stored.lock().unwrap();
        let url = format!(
            "/uploads/{}-{}",
            stored.len() + 1,
            image.file_name.unwrap_or_else(|| "image".to_string())
        );
        stored.push(url.clone());
        Ok(url)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        token_signing_secret: "test-signing-secret".to_string(),
        session_ttl: chrono::Duration::hours(1),
        cache_ttl_seconds: 60,
        currency: "usd".to_string(),
        cookie_secure: false,
        max_images_per_hotel: 6,
        max_upload_bytes: 1024 * 1024,
    }
}

pub fn create_test_state() -> (AppState, Arc<MemoryDb>) {
    let db = Arc::new(MemoryDb::default());
    let payments: Arc<dyn PaymentProvider> = Arc::new(OfflinePaymentProvider::default());

    let state = AppState::new(
        Repositories {
            users: db.clone(),
            sessions: db.clone(),
            hotels: db.clone(),
            rooms: db.clone(),
            bookings: db.clone(),
        },
        Arc::new(NullCache::new()),
        payments,
        Arc::new(MemoryImageStore::default()),
        test_settings(),
    );

    (state, db)
}

pub fn test_server(state: AppState) -> axum_test::TestServer {
    let app = axum::Router::new()
        .nest("/api", hotel_booking::api::routes::routes(state.clone()))
        .with_state(state);
    axum_test::TestServer::new(app).unwrap()
}

/// Seeds an account directly through the user service.
pub async fn create_user(state: &AppState, email: &str, is_admin: bool) -> User {
    state
        .user_service
        .create(
            hotel_booking::application::services::UserInput {
                email: email.to_string(),
                password: "secret123".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                country: None,
                city: None,
                phone: None,
                image_url: None,
            },
            is_admin,
        )
        .await
        .unwrap()
}

/// Seeds an account and returns a bearer token for it.
pub async fn login_as(state: &AppState, email: &str, is_admin: bool) -> (User, String) {
    let user = create_user(state, email, is_admin).await;
    let session = state.auth_service.start_session(user.id).await.unwrap();
    (user, session.token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn seed_hotel(db: &MemoryDb, owner_id: i64, name: &str, city: &str) -> Hotel {
    HotelRepository::create(db, new_hotel(owner_id, name, city))
        .await
        .unwrap()
}

pub async fn seed_room(db: &MemoryDb, hotel_id: i64, max_people: i32, numbers: &[i32]) -> Room {
    let room = NewRoom {
        max_people,
        ..new_room(hotel_id, numbers)
    };
    RoomRepository::create(db, room).await.unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// In-memory rendition of the hotel search `WHERE` clause.
fn hotel_matches(search: &HotelSearch, hotel: &Hotel) -> bool {
    let destination_ok = search.destination.as_deref().is_none_or(|d| {
        let needle = d.to_lowercase();
        hotel.city.to_lowercase().contains(&needle) || hotel.country.to_lowercase().contains(&needle)
    });

    destination_ok
        && search.adult_count.is_none_or(|n| hotel.adult_count >= n)
        && search.child_count.is_none_or(|n| hotel.child_count >= n)
        && search.facilities.iter().all(|f| hotel.facilities.contains(f))
        && (search.types.is_empty() || search.types.contains(&hotel.hotel_type))
        && (search.stars.is_empty() || search.stars.contains(&hotel.star_rating))
        && search
            .max_price_cents
            .is_none_or(|max| hotel.price_per_night_cents <= max)
}

// ── PostgreSQL fixtures for `#[sqlx::test]` repository tests ────────────────

pub async fn insert_test_user(pool: &sqlx::PgPool, email: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, first_name, last_name) \
         VALUES ($1, 'x', 'Test', 'User') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn new_hotel(owner_id: i64, name: &str, city: &str) -> NewHotel {
    NewHotel {
        user_id: owner_id,
        name: name.to_string(),
        city: city.to_string(),
        country: "Portugal".to_string(),
        description: "A test hotel".to_string(),
        hotel_type: "Boutique".to_string(),
        adult_count: 4,
        child_count: 2,
        facilities: vec!["Free WiFi".to_string(), "Parking".to_string()],
        price_per_night_cents: 12_000,
        star_rating: 4,
        image_urls: vec![],
    }
}

pub fn new_room(hotel_id: i64, numbers: &[i32]) -> NewRoom {
    NewRoom {
        hotel_id,
        title: "Double".to_string(),
        price_cents: 10_000,
        max_people: 2,
        description: "Two beds".to_string(),
        room_numbers: numbers.to_vec(),
    }
}
