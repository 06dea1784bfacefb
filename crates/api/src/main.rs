use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api::{create_app, AppState};
use db::{BookingService, Reconciler, StateBroadcaster};
use shared::{Config, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let migrate_only = std::env::args().any(|arg| arg == "--migrate-only");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let pool = db::create_pool(&config.database_url).await.expect("failed to create database pool");

    tracing::info!("running database migrations");
    sqlx::migrate!("../../migrations").run(&pool).await.expect("failed to run migrations");
    tracing::info!("database migrations complete");

    if migrate_only {
        tracing::info!("migration-only mode, exiting");
        return;
    }

    let clock = Arc::new(SystemClock);
    let broadcaster = StateBroadcaster::new();

    let reconciler = Reconciler::new(
        pool.clone(),
        clock.clone(),
        broadcaster.clone(),
        config.cleanup_lock_id,
        config.no_show_grace_minutes,
    );
    let last_cleanup_run_at = reconciler.last_run_handle();
    tokio::spawn(reconciler.run(Duration::from_secs(config.cleanup_tick_seconds)));

    let booking_service = BookingService::new(pool.clone(), clock, broadcaster.clone(), config.clone());

    let state = AppState::new(pool, booking_service, broadcaster, config.clone(), last_cleanup_run_at);
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.bind_port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
