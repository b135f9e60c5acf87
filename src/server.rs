//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and payment provider selection,
//! upload storage and the Axum server lifecycle.

use crate::config::{Config, mask_connection_string};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::payments::{
    OfflinePaymentProvider, PaymentProvider, StripePaymentProvider,
};
use crate::infrastructure::persistence::{
    PgBookingRepository, PgHotelRepository, PgRoomRepository, PgSessionRepository,
    PgUserRepository,
};
use crate::infrastructure::storage::LocalImageStore;
use crate::routes::app_router;
use crate::state::{AppState, Repositories, Settings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Opens the PostgreSQL pool, retrying with exponential backoff while the
/// database comes up.
///
/// # Errors
///
/// Returns the last connection error once the retries are exhausted.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(6);

    let pool = Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(&config.database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database not reachable yet");
            })
        }
    })
    .await
    .with_context(|| {
        format!(
            "Failed to connect to {}",
            mask_connection_string(&config.database_url)
        )
    })?;

    tracing::info!("Connected to database");
    Ok(pool)
}

async fn select_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn select_payments(config: &Config) -> Result<Arc<dyn PaymentProvider>> {
    match &config.stripe_secret_key {
        Some(key) => {
            let stripe = StripePaymentProvider::new(key.clone(), config.stripe_api_base.clone())
                .context("Failed to build Stripe client")?;
            tracing::info!("Payments via Stripe");
            Ok(Arc::new(stripe))
        }
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set; payments are simulated in memory");
            Ok(Arc::new(OfflinePaymentProvider::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Payment provider (Stripe, or the offline provider without a key)
/// - Local upload storage
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The upload directory cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = select_cache(&config).await;
    let payments = select_payments(&config)?;
    let image_store = Arc::new(
        LocalImageStore::new(
            &config.upload_dir,
            &config.upload_base_url,
            config.max_upload_bytes,
        )
        .await
        .context("Failed to prepare upload directory")?,
    );

    let pool = Arc::new(pool);
    let repositories = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        sessions: Arc::new(PgSessionRepository::new(pool.clone())),
        hotels: Arc::new(PgHotelRepository::new(pool.clone())),
        rooms: Arc::new(PgRoomRepository::new(pool.clone())),
        bookings: Arc::new(PgBookingRepository::new(pool.clone())),
    };

    let state = AppState::new(
        repositories,
        cache,
        payments,
        image_store,
        Settings::from_config(&config),
    );

    let app = app_router(state, &config.upload_dir, config.frontend_url.as_deref())?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}
