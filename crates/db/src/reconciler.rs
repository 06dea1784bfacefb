use std::sync::{Arc, RwLock};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use shared::Clock;
use sqlx::PgPool;

use crate::broadcaster::StateBroadcaster;
use crate::models::BookingStatus;
use crate::repositories::{BookingRepository, FacilityRepository};

/// Counts from a single reconciliation cycle, surfaced for logging and
/// for the health endpoint's last-run summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileReport {
    pub released: i64,
    pub completed: i64,
    pub just_started: i64,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.released > 0 || self.completed > 0 || self.just_started > 0
    }
}

pub struct Reconciler {
    pool: PgPool,
    clock: Arc<dyn Clock>,
    broadcaster: StateBroadcaster,
    lock_id: i64,
    no_show_grace_minutes: i64,
    /// Single-writer (this reconciler), many-reader (health probes)
    /// timestamp of the last cycle this process ran.
    last_run: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl Reconciler {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>, broadcaster: StateBroadcaster, lock_id: i64, no_show_grace_minutes: i64) -> Self {
        Self {
            pool,
            clock,
            broadcaster,
            lock_id,
            no_show_grace_minutes,
            last_run: Arc::new(RwLock::new(None)),
        }
    }

    /// A handle observers (e.g. the health endpoint) can read without
    /// going through the reconciler itself.
    pub fn last_run_handle(&self) -> Arc<RwLock<Option<DateTime<Utc>>>> {
        self.last_run.clone()
    }

    /// Run cycles on a fixed tick until the process is shut down.
    pub async fn run(self, tick: StdDuration) {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let outcome = self.tick().await;
            *self.last_run.write().unwrap() = Some(self.clock.now());
            match outcome {
                Ok(report) if report.changed() => {
                    tracing::info!(
                        released = report.released,
                        completed = report.completed,
                        just_started = report.just_started,
                        "reconciler cycle made changes"
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "reconciler cycle failed"),
            }
        }
    }

    /// A single cycle: acquire the singleton lock, release no-shows,
    /// complete expired sessions, detect newly-active bookings, release
    /// the lock, and notify observers if anything changed.
    pub async fn tick(&self) -> Result<ReconcileReport, sqlx::Error> {
        let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
            .bind(self.lock_id)
            .fetch_one(&self.pool)
            .await?;
        if !acquired.0 {
            return Ok(ReconcileReport::default());
        }

        let result = self.run_cycle().await;

        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(self.lock_id)
            .execute(&self.pool)
            .await?;

        result
    }

    async fn run_cycle(&self) -> Result<ReconcileReport, sqlx::Error> {
        let now = self.clock.now();
        let grace = chrono::Duration::minutes(self.no_show_grace_minutes);

        let released = self.release_no_shows(now - grace).await?;
        let completed = self.complete_expired_sessions(now).await?;
        let just_started = BookingRepository::count_just_started(&self.pool, now - chrono::Duration::minutes(1), now).await?;

        let report = ReconcileReport { released, completed, just_started };
        if report.changed() {
            self.broadcaster.notify();
        }

        Ok(report)
    }

    async fn release_no_shows(&self, threshold: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let candidates = BookingRepository::find_no_show_candidates(&self.pool, threshold).await?;
        let mut count = 0;
        for booking_id in candidates {
            let mut tx = self.pool.begin().await?;
            let Some(facility_id) = BookingRepository::peek_facility_id(&mut tx, booking_id).await? else {
                tx.rollback().await?;
                continue;
            };
            FacilityRepository::find_for_update(&mut tx, facility_id).await?;
            let Some(booking) = BookingRepository::find_for_update(&mut tx, booking_id).await? else {
                tx.rollback().await?;
                continue;
            };
            if booking.status != BookingStatus::Scheduled || booking.starts_at >= threshold {
                tx.rollback().await?;
                continue;
            }
            BookingRepository::update_status_in_tx(&mut tx, booking_id, BookingStatus::Released).await?;
            tx.commit().await?;
            count += 1;
        }
        Ok(count)
    }

    async fn complete_expired_sessions(&self, now: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let candidates = BookingRepository::find_expired_session_candidates(&self.pool, now).await?;
        let mut count = 0;
        for booking_id in candidates {
            let mut tx = self.pool.begin().await?;
            let Some(facility_id) = BookingRepository::peek_facility_id(&mut tx, booking_id).await? else {
                tx.rollback().await?;
                continue;
            };
            FacilityRepository::find_for_update(&mut tx, facility_id).await?;
            let Some(booking) = BookingRepository::find_for_update(&mut tx, booking_id).await? else {
                tx.rollback().await?;
                continue;
            };
            if booking.status != BookingStatus::CheckedIn || booking.ends_at > now {
                tx.rollback().await?;
                continue;
            }
            BookingRepository::update_status_in_tx(&mut tx, booking_id, BookingStatus::Completed).await?;
            tx.commit().await?;
            count += 1;
        }
        Ok(count)
    }
}
