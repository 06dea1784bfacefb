use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::CoreError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Individual,
    Club,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Individual => write!(f, "individual"),
            UserType::Club => write!(f, "club"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    TimeBased,
    FullDay,
}

/// The four-state lifecycle. Every transition away from `Scheduled` or
/// `CheckedIn` is final; there is no path back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Released,
}

impl BookingStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Scheduled | BookingStatus::CheckedIn)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::Completed => "completed",
            BookingStatus::Released => "released",
        };
        write!(f, "{s}")
    }
}

/// Guards the `scheduled -> checked_in` transition.
///
/// Caller identity must match the owner, and `now` must fall in
/// `[starts_at, starts_at + grace)`.
pub fn guard_check_in(
    status: BookingStatus,
    booked_by: &str,
    caller: &str,
    starts_at: DateTime<Utc>,
    now: DateTime<Utc>,
    grace: chrono::Duration,
) -> Result<(), CoreError> {
    if status != BookingStatus::Scheduled {
        return Err(CoreError::BadRequest(format!(
            "booking is {status}, cannot check in"
        )));
    }
    if caller != booked_by {
        return Err(CoreError::Forbidden("caller does not own this booking".into()));
    }
    if now < starts_at {
        return Err(CoreError::Forbidden("too early to check in".into()));
    }
    if now > starts_at + grace {
        return Err(CoreError::Forbidden("check-in window has expired".into()));
    }
    Ok(())
}

/// Guards the `checked_in -> completed` transition.
pub fn guard_check_out(status: BookingStatus, booked_by: &str, caller: &str) -> Result<(), CoreError> {
    if status != BookingStatus::CheckedIn {
        return Err(CoreError::BadRequest(format!(
            "booking is {status}, cannot check out"
        )));
    }
    if caller != booked_by {
        return Err(CoreError::Forbidden("caller does not own this booking".into()));
    }
    Ok(())
}

/// Guards the `scheduled -> released` cancel transition.
pub fn guard_cancel(status: BookingStatus, booked_by: &str, caller: &str) -> Result<(), CoreError> {
    if status != BookingStatus::Scheduled {
        return Err(CoreError::BadRequest(format!(
            "booking is {status}, cannot cancel"
        )));
    }
    if caller != booked_by {
        return Err(CoreError::Forbidden("caller does not own this booking".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn check_in_exact_start_is_allowed() {
        let grace = chrono::Duration::minutes(15);
        assert!(guard_check_in(BookingStatus::Scheduled, "alice", "alice", at(17, 0), at(17, 0), grace).is_ok());
    }

    #[test]
    fn check_in_one_second_early_is_forbidden() {
        let grace = chrono::Duration::minutes(15);
        let starts = at(17, 0);
        let now = starts - chrono::Duration::seconds(1);
        assert!(matches!(
            guard_check_in(BookingStatus::Scheduled, "alice", "alice", starts, now, grace),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn check_in_at_grace_boundary_allowed_after_forbidden() {
        let grace = chrono::Duration::minutes(15);
        let starts = at(17, 0);
        assert!(guard_check_in(BookingStatus::Scheduled, "alice", "alice", starts, starts + grace, grace).is_ok());
        assert!(guard_check_in(
            BookingStatus::Scheduled,
            "alice",
            "alice",
            starts,
            starts + grace + chrono::Duration::seconds(1),
            grace
        )
        .is_err());
    }

    #[test]
    fn check_in_wrong_caller_is_forbidden() {
        let grace = chrono::Duration::minutes(15);
        assert!(matches!(
            guard_check_in(BookingStatus::Scheduled, "alice", "bob", at(17, 0), at(17, 0), grace),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn check_out_requires_checked_in() {
        assert!(guard_check_out(BookingStatus::Scheduled, "alice", "alice").is_err());
        assert!(guard_check_out(BookingStatus::CheckedIn, "alice", "alice").is_ok());
    }

    #[test]
    fn cancel_requires_scheduled_and_owner() {
        assert!(guard_cancel(BookingStatus::CheckedIn, "alice", "alice").is_err());
        assert!(guard_cancel(BookingStatus::Scheduled, "alice", "bob").is_err());
        assert!(guard_cancel(BookingStatus::Scheduled, "alice", "alice").is_ok());
    }
}
