use crate::booking::{BookingType, UserType};
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use shared::CoreError;

/// Full-day classification threshold: a claim spanning 8 hours or more
/// is treated as a full-day claim rather than a slotted one.
const FULL_DAY_THRESHOLD_MINUTES: i64 = 8 * 60;

/// Static facility policy inputs the evaluator needs; everything else
/// about a facility (name, capacity, category) is irrelevant to
/// validation.
#[derive(Debug, Clone)]
pub struct FacilityPolicy {
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

/// Round `t` to the nearest `slot_size_minutes` boundary, seconds
/// zeroed. Ties (exactly half the slot past a boundary) round up.
pub fn snap_to_slot(t: DateTime<Utc>, slot_size_minutes: i64) -> DateTime<Utc> {
    let total_minutes = t.hour() as i64 * 60 + t.minute() as i64;
    let rounded = ((total_minutes + slot_size_minutes / 2) / slot_size_minutes) * slot_size_minutes;
    let midnight = t.with_hour(0).unwrap().with_minute(0).unwrap().with_second(0).unwrap().with_nanosecond(0).unwrap();
    midnight + Duration::minutes(rounded)
}

/// The smallest `slot_size_minutes` boundary strictly greater than `t`.
///
/// Used at check-out: a checkout landing exactly on a boundary still
/// jumps to the next one, by design.
pub fn snap_to_next_boundary(t: DateTime<Utc>, slot_size_minutes: i64) -> DateTime<Utc> {
    let base = t.with_second(0).unwrap().with_nanosecond(0).unwrap();
    let total_minutes = base.hour() as i64 * 60 + base.minute() as i64;
    let next = ((total_minutes / slot_size_minutes) + 1) * slot_size_minutes;
    let midnight = base.with_hour(0).unwrap().with_minute(0).unwrap();
    midnight + Duration::minutes(next)
}

/// `identity + "_" + epoch_millis(starts_at)` — deterministic so a
/// double-submit for the same snapped start collides.
pub fn generate_idempotency_key(identity: &str, starts_at: DateTime<Utc>) -> String {
    format!("{identity}_{}", starts_at.timestamp_millis())
}

/// Validate a snapped request against facility policy and return the
/// resulting booking type classification, or the first failing rule.
#[allow(clippy::too_many_arguments)]
pub fn validate(
    facility: &FacilityPolicy,
    snapped_start: DateTime<Utc>,
    snapped_end: DateTime<Utc>,
    user_type: UserType,
    now: DateTime<Utc>,
    horizon_days: i64,
) -> Result<BookingType, CoreError> {
    if snapped_start < now {
        return Err(CoreError::Forbidden("cannot book in the past".into()));
    }
    if snapped_start > now + Duration::days(horizon_days) {
        return Err(CoreError::Forbidden(format!(
            "start time is beyond the {horizon_days}-day booking horizon"
        )));
    }
    if snapped_end <= snapped_start {
        return Err(CoreError::BadRequest("end time must be after start time".into()));
    }

    let duration_minutes = (snapped_end - snapped_start).num_minutes();
    let booking_type = if duration_minutes >= FULL_DAY_THRESHOLD_MINUTES {
        BookingType::FullDay
    } else {
        BookingType::TimeBased
    };

    match booking_type {
        BookingType::TimeBased => {
            if snapped_start.time() < facility.open_time || snapped_end.time() > facility.close_time {
                return Err(CoreError::BadRequest("requested window is outside operating hours".into()));
            }
            if duration_minutes < facility.min_duration_minutes || duration_minutes > facility.max_duration_minutes {
                return Err(CoreError::BadRequest(format!(
                    "duration must be between {} and {} minutes",
                    facility.min_duration_minutes, facility.max_duration_minutes
                )));
            }
        }
        BookingType::FullDay => {
            if user_type != UserType::Club {
                return Err(CoreError::Forbidden("full-day claims are club-only".into()));
            }
        }
    }

    Ok(booking_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, s).unwrap()
    }

    fn policy() -> FacilityPolicy {
        FacilityPolicy {
            min_duration_minutes: 30,
            max_duration_minutes: 120,
            open_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        }
    }

    #[test]
    fn snap_rounds_to_nearest_half_hour() {
        assert_eq!(snap_to_slot(at(16, 7, 0), 30), at(16, 0, 0));
        assert_eq!(snap_to_slot(at(16, 52, 0), 30), at(17, 0, 0));
        assert_eq!(snap_to_slot(at(16, 15, 0), 30), at(16, 30, 0)); // tie rounds up
    }

    #[test]
    fn next_boundary_is_strictly_greater() {
        assert_eq!(snap_to_next_boundary(at(17, 30, 0), 30), at(18, 0, 0));
        assert_eq!(snap_to_next_boundary(at(17, 29, 59), 30), at(17, 30, 0));
    }

    #[test]
    fn idempotency_key_is_deterministic() {
        let start = at(16, 0, 0);
        assert_eq!(
            generate_idempotency_key("alice", start),
            generate_idempotency_key("alice", start)
        );
    }

    #[test]
    fn duration_exactly_eight_hours_is_full_day() {
        let now = at(9, 0, 0);
        let start = at(9, 0, 0);
        let end = start + Duration::hours(8);
        assert_eq!(
            validate(&policy(), start, end, UserType::Club, now, 7).unwrap(),
            BookingType::FullDay
        );
    }

    #[test]
    fn duration_one_minute_under_eight_hours_is_time_based() {
        let now = at(9, 0, 0);
        let start = at(9, 0, 0);
        let end = start + Duration::hours(8) - Duration::minutes(1);
        // time_based at this duration also violates max_duration, so expect a BadRequest
        assert!(matches!(
            validate(&policy(), start, end, UserType::Individual, now, 7),
            Err(CoreError::BadRequest(_))
        ));
    }

    #[test]
    fn full_day_rejects_individual() {
        let now = at(9, 0, 0);
        let start = at(0, 0, 0) + Duration::days(1);
        let end = start + Duration::hours(8);
        assert!(matches!(
            validate(&policy(), start, end, UserType::Individual, now, 7),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn past_start_is_forbidden() {
        let now = at(16, 0, 0);
        let start = now - Duration::minutes(1);
        let end = now + Duration::hours(1);
        assert!(matches!(
            validate(&policy(), start, end, UserType::Individual, now, 7),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn beyond_horizon_is_forbidden() {
        let now = at(9, 0, 0);
        let start = now + Duration::days(8);
        let end = start + Duration::hours(1);
        assert!(matches!(
            validate(&policy(), start, end, UserType::Individual, now, 7),
            Err(CoreError::Forbidden(_))
        ));
    }
}
