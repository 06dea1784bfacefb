pub mod booking_service;
pub mod broadcaster;
pub mod models;
pub mod reconciler;
pub mod repositories;
pub mod seed;

pub use booking_service::{BookingService, CreateBookingRequest};
pub use broadcaster::StateBroadcaster;
pub use models::*;
pub use reconciler::{ReconcileReport, Reconciler};
pub use repositories::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create a database connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(10).connect(database_url).await
}
