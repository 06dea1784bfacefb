use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use db::{BookingService, StateBroadcaster};
use shared::Config;
use sqlx::PgPool;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub booking_service: Arc<BookingService>,
    pub broadcaster: StateBroadcaster,
    pub config: Arc<Config>,
    pub last_cleanup_run_at: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        booking_service: BookingService,
        broadcaster: StateBroadcaster,
        config: Config,
        last_cleanup_run_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    ) -> Self {
        Self {
            pool,
            booking_service: Arc::new(booking_service),
            broadcaster,
            config: Arc::new(config),
            last_cleanup_run_at,
        }
    }
}
