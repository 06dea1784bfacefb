use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{
    booking::{guard_cancel, guard_check_in, guard_check_out},
    policy, BookingType as CoreBookingType, UserType as CoreUserType,
};
use shared::{BookingId, Clock, CoreError, Config, ConflictDetails, FacilityId, FacilityUnitId};
use sqlx::PgPool;

use crate::broadcaster::StateBroadcaster;
use crate::models::{Booking, BookingStatus as DbBookingStatus, BookingType as DbBookingType, CreateBooking, Facility, UserType as DbUserType};
use crate::repositories::{BookingRepository, FacilityRepository, FacilityUnitRepository};

#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub facility_id: FacilityId,
    pub unit_id: Option<FacilityUnitId>,
    pub user_name: String,
    pub user_type: CoreUserType,
    pub club_name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Orchestrates booking creation and lifecycle transitions. Owns the
/// state machine; the policy evaluator it calls out to never touches
/// the store.
pub struct BookingService {
    pool: PgPool,
    clock: Arc<dyn Clock>,
    broadcaster: StateBroadcaster,
    config: Config,
}

impl BookingService {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>, broadcaster: StateBroadcaster, config: Config) -> Self {
        Self { pool, clock, broadcaster, config }
    }

    pub async fn create(&self, request: CreateBookingRequest) -> Result<Booking, CoreError> {
        let now = self.clock.now();
        let snapped_start = policy::snap_to_slot(request.starts_at, self.config.slot_size_minutes);
        let snapped_end = policy::snap_to_slot(request.ends_at, self.config.slot_size_minutes);
        let idempotency_key = policy::generate_idempotency_key(&request.user_name, snapped_start);

        let mut tx = self.pool.begin().await.map_err(|e| CoreError::Internal(e.to_string()))?;

        let facility = FacilityRepository::find_for_update(&mut tx, request.facility_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("facility not found".into()))?;

        let horizon_days = if request.user_type == CoreUserType::Club {
            self.config.club_booking_horizon_days
        } else {
            self.config.max_booking_horizon_days
        };

        let booking_type = policy::validate(
            &facility.policy(),
            snapped_start,
            snapped_end,
            request.user_type,
            now,
            horizon_days,
        )?;

        let (day_start, day_end) = domain::day_window(snapped_start.date_naive());

        match booking_type {
            CoreBookingType::TimeBased => {
                let full_day_claims =
                    BookingRepository::find_active_full_day_on_facility(&mut tx, request.facility_id, day_start, day_end)
                        .await
                        .map_err(|e| CoreError::Internal(e.to_string()))?;
                if let Some(incumbent) = full_day_claims.first() {
                    tx.rollback().await.ok();
                    return Err(full_day_conflict(incumbent, &facility));
                }
            }
            CoreBookingType::FullDay => {
                if request.user_type != CoreUserType::Club {
                    tx.rollback().await.ok();
                    return Err(CoreError::Forbidden("full-day claims are club-only".into()));
                }
                let existing = if facility.is_pooled {
                    BookingRepository::find_active_on_facility_for_day(&mut tx, request.facility_id, day_start, day_end)
                        .await
                        .map_err(|e| CoreError::Internal(e.to_string()))?
                } else {
                    let unit_id = request
                        .unit_id
                        .ok_or_else(|| CoreError::BadRequest("unit_id is required for this facility".into()))?;
                    BookingRepository::find_active_on_unit_for_day(&mut tx, unit_id, day_start, day_end)
                        .await
                        .map_err(|e| CoreError::Internal(e.to_string()))?
                };
                if let Some(incumbent) = existing.first() {
                    tx.rollback().await.ok();
                    let message = if incumbent.booking_type == DbBookingType::FullDay {
                        format!(
                            "the day is taken by {}",
                            incumbent.club_name.clone().unwrap_or_else(|| incumbent.booked_by.clone())
                        )
                    } else {
                        "there are per-slot bookings on this day".to_string()
                    };
                    return Err(CoreError::conflict_with(message, details_for(incumbent, &facility)));
                }
            }
        }

        if request.user_type == CoreUserType::Club {
            match &request.club_name {
                Some(name) if self.config.valid_clubs.contains(name) => {}
                _ => {
                    tx.rollback().await.ok();
                    return Err(CoreError::BadRequest("club_name must be a registered club".into()));
                }
            }
        }

        let self_overlap = BookingRepository::find_self_overlap(&mut tx, &request.user_name, snapped_start, snapped_end)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        if !self_overlap.is_empty() {
            tx.rollback().await.ok();
            return Err(CoreError::conflict("you already have a booking that overlaps this window"));
        }

        if facility.is_pooled {
            let count = BookingRepository::count_active_on_facility(&mut tx, request.facility_id, snapped_start, snapped_end)
                .await
                .map_err(|e| CoreError::Internal(e.to_string()))?;
            if count >= facility.total_capacity as i64 {
                tx.rollback().await.ok();
                return Err(CoreError::conflict("facility is at capacity for this window"));
            }
        } else {
            let unit_id = request
                .unit_id
                .ok_or_else(|| CoreError::BadRequest("unit_id is required for this facility".into()))?;
            let unit = FacilityUnitRepository::find_for_update(&mut tx, unit_id)
                .await
                .map_err(|e| CoreError::Internal(e.to_string()))?
                .ok_or_else(|| CoreError::BadRequest("unit not found".into()))?;
            if unit.facility_id != request.facility_id {
                tx.rollback().await.ok();
                return Err(CoreError::BadRequest("unit does not belong to this facility".into()));
            }
            let conflicts = BookingRepository::find_active_on_unit_overlapping(&mut tx, unit_id, snapped_start, snapped_end)
                .await
                .map_err(|e| CoreError::Internal(e.to_string()))?;
            if let Some(incumbent) = conflicts.first() {
                tx.rollback().await.ok();
                return Err(CoreError::conflict_with(
                    "unit is already booked for this window",
                    details_for(incumbent, &facility),
                ));
            }
        }

        let insert = BookingRepository::create_in_tx(
            &mut tx,
            CreateBooking {
                facility_id: request.facility_id,
                unit_id: request.unit_id,
                booked_by: request.user_name.clone(),
                user_type: DbUserType::from(request.user_type),
                club_name: request.club_name.clone(),
                booking_type: DbBookingType::from(booking_type),
                starts_at: snapped_start,
                ends_at: snapped_end,
                idempotency_key,
            },
        )
        .await;

        let booking = match insert {
            Ok(b) => b,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await.ok();
                return Err(CoreError::conflict("duplicate submission"));
            }
            Err(e) => {
                tx.rollback().await.ok();
                return Err(CoreError::Internal(e.to_string()));
            }
        };

        tx.commit().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        self.broadcaster.notify();
        Ok(booking)
    }

    pub async fn check_in(&self, booking_id: BookingId, caller: &str) -> Result<Booking, CoreError> {
        let now = self.clock.now();
        let grace = chrono::Duration::minutes(self.config.no_show_grace_minutes);

        let mut tx = self.pool.begin().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        let facility_id = BookingRepository::peek_facility_id(&mut tx, booking_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("booking not found".into()))?;
        let _facility = FacilityRepository::find_for_update(&mut tx, facility_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("facility not found".into()))?;
        let booking = BookingRepository::find_for_update(&mut tx, booking_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("booking not found".into()))?;

        guard_check_in(booking.status.into(), &booking.booked_by, caller, booking.starts_at, now, grace)?;

        let updated = BookingRepository::update_status_in_tx(&mut tx, booking_id, DbBookingStatus::CheckedIn)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        tx.commit().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        self.broadcaster.notify();
        Ok(updated)
    }

    pub async fn check_out(&self, booking_id: BookingId, caller: &str) -> Result<Booking, CoreError> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        let facility_id = BookingRepository::peek_facility_id(&mut tx, booking_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("booking not found".into()))?;
        let _facility = FacilityRepository::find_for_update(&mut tx, facility_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("facility not found".into()))?;
        let booking = BookingRepository::find_for_update(&mut tx, booking_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("booking not found".into()))?;

        guard_check_out(booking.status.into(), &booking.booked_by, caller)?;

        let new_end = policy::snap_to_next_boundary(now, self.config.slot_size_minutes);
        let updated = BookingRepository::complete_with_end_in_tx(&mut tx, booking_id, new_end)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        tx.commit().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        self.broadcaster.notify();
        Ok(updated)
    }

    pub async fn cancel(&self, booking_id: BookingId, caller: &str) -> Result<Booking, CoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        let facility_id = BookingRepository::peek_facility_id(&mut tx, booking_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("booking not found".into()))?;
        let _facility = FacilityRepository::find_for_update(&mut tx, facility_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("facility not found".into()))?;
        let booking = BookingRepository::find_for_update(&mut tx, booking_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .ok_or_else(|| CoreError::NotFound("booking not found".into()))?;

        guard_cancel(booking.status.into(), &booking.booked_by, caller)?;

        let updated = BookingRepository::update_status_in_tx(&mut tx, booking_id, DbBookingStatus::Released)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        tx.commit().await.map_err(|e| CoreError::Internal(e.to_string()))?;
        self.broadcaster.notify();
        Ok(updated)
    }
}

fn details_for(incumbent: &Booking, facility: &Facility) -> ConflictDetails {
    let user_type = CoreUserType::from(incumbent.user_type).to_string();
    let booked_by = if facility.is_event_space() && incumbent.user_type == DbUserType::Club {
        incumbent.club_name.clone().unwrap_or_else(|| incumbent.booked_by.clone())
    } else {
        incumbent.booked_by.clone()
    };
    ConflictDetails::incumbent(booked_by, user_type, incumbent.club_name.clone(), incumbent.starts_at, incumbent.ends_at)
}

fn full_day_conflict(incumbent: &Booking, facility: &Facility) -> CoreError {
    let name = incumbent.club_name.clone().unwrap_or_else(|| incumbent.booked_by.clone());
    CoreError::conflict_with(format!("the day is claimed by {name}"), details_for(incumbent, facility))
}
