use chrono::NaiveDate;
use domain::{day_window, ScheduleBooking, ScheduleDay, ScheduleUnit};
use shared::{CoreError, FacilityId};
use sqlx::PgPool;

use crate::repositories::FacilityUnitRepository;

pub struct ScheduleRepository;

impl ScheduleRepository {
    pub async fn get_schedule_for_date(
        pool: &PgPool,
        facility_id: FacilityId,
        date: NaiveDate,
    ) -> Result<ScheduleDay, CoreError> {
        let (day_start, day_end) = day_window(date);

        let units = FacilityUnitRepository::list_operational(pool, facility_id)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        let mut schedule_units = Vec::with_capacity(units.len());
        for unit in units {
            let bookings = sqlx::query_as::<_, crate::models::Booking>(
                r#"
                SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                       starts_at, ends_at, status, idempotency_key, created_at
                FROM bookings
                WHERE unit_id = $1
                  AND status IN ('scheduled', 'checked_in')
                  AND starts_at < $3
                  AND ends_at > $2
                ORDER BY starts_at ASC
                "#,
            )
            .bind(unit.id.as_uuid())
            .bind(day_start)
            .bind(day_end)
            .fetch_all(pool)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;

            schedule_units.push(ScheduleUnit {
                unit_id: unit.id.to_string(),
                unit_name: unit.unit_name,
                bookings: bookings
                    .into_iter()
                    .map(|b| ScheduleBooking {
                        booking_id: b.id.to_string(),
                        booked_by: b.booked_by,
                        starts_at: b.starts_at,
                        ends_at: b.ends_at,
                    })
                    .collect(),
            });
        }

        // Pooled facilities have no units; surface bookings under a
        // single synthetic row rather than dropping them from the view.
        if schedule_units.is_empty() {
            let pooled_bookings = sqlx::query_as::<_, crate::models::Booking>(
                r#"
                SELECT id, facility_id, unit_id, booked_by, user_type, club_name, booking_type,
                       starts_at, ends_at, status, idempotency_key, created_at
                FROM bookings
                WHERE facility_id = $1
                  AND unit_id IS NULL
                  AND status IN ('scheduled', 'checked_in')
                  AND starts_at < $3
                  AND ends_at > $2
                ORDER BY starts_at ASC
                "#,
            )
            .bind(facility_id.as_uuid())
            .bind(day_start)
            .bind(day_end)
            .fetch_all(pool)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;

            if !pooled_bookings.is_empty() {
                schedule_units.push(ScheduleUnit {
                    unit_id: facility_id.to_string(),
                    unit_name: "Pooled".to_string(),
                    bookings: pooled_bookings
                        .into_iter()
                        .map(|b| ScheduleBooking {
                            booking_id: b.id.to_string(),
                            booked_by: b.booked_by,
                            starts_at: b.starts_at,
                            ends_at: b.ends_at,
                        })
                        .collect(),
                });
            }
        }

        Ok(ScheduleDay { date, units: schedule_units })
    }
}
