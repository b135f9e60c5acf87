//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AuthService, BookingService, HotelService, RoomService, UserService,
};
use crate::config::Config;
use crate::domain::repositories::{
    BookingRepository, HotelRepository, RoomRepository, SessionRepository, UserRepository,
};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::payments::PaymentProvider;
use crate::infrastructure::storage::ImageStore;

pub type SharedAuthService = AuthService<dyn UserRepository, dyn SessionRepository>;
pub type SharedUserService = UserService<dyn UserRepository>;
pub type SharedHotelService = HotelService<dyn HotelRepository>;
pub type SharedRoomService = RoomService<dyn RoomRepository, dyn HotelRepository>;
pub type SharedBookingService =
    BookingService<dyn BookingRepository, dyn RoomRepository, dyn HotelRepository>;

/// Repository implementations the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

/// Settings consumed by services and handlers.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token_signing_secret: String,
    pub session_ttl: chrono::Duration,
    pub cache_ttl_seconds: u64,
    pub currency: String,
    /// Adds `Secure` to the session cookie.
    pub cookie_secure: bool,
    pub max_images_per_hotel: usize,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            token_signing_secret: config.token_signing_secret.clone(),
            session_ttl: chrono::Duration::hours(config.session_ttl_hours),
            cache_ttl_seconds: config.cache_ttl_seconds,
            currency: config.currency.clone(),
            cookie_secure: config.cookie_secure,
            max_images_per_hotel: config.max_images_per_hotel,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Request body ceiling: a full set of images plus room for text fields.
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes
            .saturating_mul(self.max_images_per_hotel)
            .saturating_add(1024 * 1024)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<SharedAuthService>,
    pub user_service: Arc<SharedUserService>,
    pub hotel_service: Arc<SharedHotelService>,
    pub room_service: Arc<SharedRoomService>,
    pub booking_service: Arc<SharedBookingService>,
    pub image_store: Arc<dyn ImageStore>,
    pub cache: Arc<dyn CacheService>,
    pub cookie_secure: bool,
    pub max_images_per_hotel: usize,
    pub body_limit: usize,
}

impl AppState {
    /// Wires the services on top of the given infrastructure.
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        payments: Arc<dyn PaymentProvider>,
        image_store: Arc<dyn ImageStore>,
        settings: Settings,
    ) -> Self {
        let body_limit = settings.body_limit();
        let Repositories {
            users,
            sessions,
            hotels,
            rooms,
            bookings,
        } = repositories;

        Self {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                sessions,
                settings.token_signing_secret,
                settings.session_ttl,
            )),
            user_service: Arc::new(UserService::new(users)),
            hotel_service: Arc::new(HotelService::new(
                hotels.clone(),
                cache.clone(),
                settings.cache_ttl_seconds,
            )),
            room_service: Arc::new(RoomService::new(
                rooms.clone(),
                hotels.clone(),
                cache.clone(),
            )),
            booking_service: Arc::new(BookingService::new(
                bookings,
                rooms,
                hotels,
                payments,
                settings.currency,
            )),
            image_store,
            cache,
            cookie_secure: settings.cookie_secure,
            max_images_per_hotel: settings.max_images_per_hotel,
            body_limit,
        }
    }
}
