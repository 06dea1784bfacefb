use chrono::{DateTime, Utc};
use shared::{BookingId, FacilityId, FacilityUnitId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{Booking, BookingStatus, BookingWithContext, CreateBooking};

pub struct BookingRepository;

impl BookingRepository {
    pub async fn find_by_id(pool: &PgPool, id: BookingId) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
    }

    /// Lock the booking row; called after the facility row is already
    /// locked, preserving facility -> unit -> booking lock order.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: BookingId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
    }

    /// Unlocked lookup of the owning facility id, so callers can acquire
    /// the facility lock before locking the booking row itself. A
    /// booking's `facility_id` never changes after insert, so reading it
    /// without a lock here is safe.
    pub async fn peek_facility_id(
        tx: &mut Transaction<'_, Postgres>,
        id: BookingId,
    ) -> Result<Option<FacilityId>, sqlx::Error> {
        let row: Option<(uuid::Uuid,)> = sqlx::query_as("SELECT facility_id FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.map(|(id,)| FacilityId::from_uuid(id)))
    }

    /// Bookings for a user, joined with the facility and (if any) unit
    /// they were made against — what the listing endpoint hands back.
    pub async fn find_by_user(pool: &PgPool, booked_by: &str) -> Result<Vec<BookingWithContext>, sqlx::Error> {
        sqlx::query_as::<_, BookingWithContext>(
            r#"
            SELECT b.id, b.facility_id, b.unit_id, b.booked_by, b.user_type, b.club_name, b.booking_type,
                   b.starts_at, b.ends_at, b.status, b.idempotency_key, b.created_at,
                   f.name AS facility_name, u.unit_name
            FROM bookings b
            JOIN facilities f ON f.id = b.facility_id
            LEFT JOIN facility_units u ON u.id = b.unit_id
            WHERE b.booked_by = $1
            ORDER BY b.starts_at DESC
            "#,
        )
        .bind(booked_by)
        .fetch_all(pool)
        .await
    }

    /// Active bookings by this identity overlapping [start, end).
    pub async fn find_self_overlap(
        tx: &mut Transaction<'_, Postgres>,
        booked_by: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE booked_by = $1
              AND status IN ('scheduled', 'checked_in')
              AND starts_at < $3
              AND ends_at > $2
            "#,
        )
        .bind(booked_by)
        .bind(start)
        .bind(end)
        .fetch_all(&mut **tx)
        .await
    }

    /// Active full-day bookings on a facility intersecting [day_start, day_end).
    pub async fn find_active_full_day_on_facility(
        tx: &mut Transaction<'_, Postgres>,
        facility_id: FacilityId,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE facility_id = $1
              AND booking_type = 'full_day'
              AND status IN ('scheduled', 'checked_in')
              AND starts_at < $3
              AND ends_at > $2
            "#,
        )
        .bind(facility_id.as_uuid())
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&mut **tx)
        .await
    }

    /// Any active booking on the facility (pooled) or unit (non-pooled)
    /// intersecting the civil day — used for the full-day claim check.
    pub async fn find_active_on_facility_for_day(
        tx: &mut Transaction<'_, Postgres>,
        facility_id: FacilityId,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE facility_id = $1
              AND status IN ('scheduled', 'checked_in')
              AND starts_at < $3
              AND ends_at > $2
            "#,
        )
        .bind(facility_id.as_uuid())
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&mut **tx)
        .await
    }

    pub async fn find_active_on_unit_for_day(
        tx: &mut Transaction<'_, Postgres>,
        unit_id: FacilityUnitId,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE unit_id = $1
              AND status IN ('scheduled', 'checked_in')
              AND starts_at < $3
              AND ends_at > $2
            "#,
        )
        .bind(unit_id.as_uuid())
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&mut **tx)
        .await
    }

    /// Count of active bookings on a pooled facility overlapping [start, end).
    pub async fn count_active_on_facility(
        tx: &mut Transaction<'_, Postgres>,
        facility_id: FacilityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE facility_id = $1
              AND status IN ('scheduled', 'checked_in')
              AND starts_at < $3
              AND ends_at > $2
            "#,
        )
        .bind(facility_id.as_uuid())
        .bind(start)
        .bind(end)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.0)
    }

    /// Active bookings on a unit overlapping [start, end) — the
    /// per-unit conflict check for non-pooled facilities.
    pub async fn find_active_on_unit_overlapping(
        tx: &mut Transaction<'_, Postgres>,
        unit_id: FacilityUnitId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                   starts_at, ends_at, status, idempotency_key, created_at
            FROM bookings
            WHERE unit_id = $1
              AND status IN ('scheduled', 'checked_in')
              AND starts_at < $3
              AND ends_at > $2
            "#,
        )
        .bind(unit_id.as_uuid())
        .bind(start)
        .bind(end)
        .fetch_all(&mut **tx)
        .await
    }

    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: CreateBooking,
    ) -> Result<Booking, sqlx::Error> {
        let id = BookingId::new();
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, facility_id, unit_id, booked_by, user_type, club_name,
                                   booking_type, starts_at, ends_at, status, idempotency_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'scheduled', $10)
            RETURNING id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                      starts_at, ends_at, status, idempotency_key, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.facility_id.as_uuid())
        .bind(input.unit_id.map(|u| *u.as_uuid()))
        .bind(&input.booked_by)
        .bind(input.user_type)
        .bind(&input.club_name)
        .bind(input.booking_type)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(&input.idempotency_key)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn update_status_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2
            WHERE id = $1
            RETURNING id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                      starts_at, ends_at, status, idempotency_key, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(status)
        .fetch_one(&mut **tx)
        .await
    }

    /// Check out: set status and rewrite `ends_at` in one statement.
    pub async fn complete_with_end_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: BookingId,
        ends_at: DateTime<Utc>,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'completed', ends_at = $2
            WHERE id = $1
            RETURNING id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                      starts_at, ends_at, status, idempotency_key, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(ends_at)
        .fetch_one(&mut **tx)
        .await
    }

    /// Scheduled bookings whose no-show grace window has elapsed.
    pub async fn find_no_show_candidates(pool: &PgPool, threshold: DateTime<Utc>) -> Result<Vec<BookingId>, sqlx::Error> {
        let rows: Vec<(uuid::Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM bookings
            WHERE status = 'scheduled' AND starts_at < $1
            "#,
        )
        .bind(threshold)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| BookingId::from_uuid(id)).collect())
    }

    /// Checked-in bookings whose session has already ended.
    pub async fn find_expired_session_candidates(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<BookingId>, sqlx::Error> {
        let rows: Vec<(uuid::Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM bookings
            WHERE status = 'checked_in' AND ends_at <= $1
            "#,
        )
        .bind(now)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| BookingId::from_uuid(id)).collect())
    }

    /// Bookings that transitioned into their active window in the last
    /// minute — a coarse "something just started" signal for the
    /// reconciler.
    pub async fn count_just_started(pool: &PgPool, window_start: DateTime<Utc>, now: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE status = 'scheduled' AND starts_at > $1 AND starts_at <= $2
            "#,
        )
        .bind(window_start)
        .bind(now)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
