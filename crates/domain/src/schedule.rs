use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// [start, end) of a civil day, in UTC. Facility timezone is advisory
/// only; schedule windows are always computed in UTC.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = start + chrono::Duration::days(1);
    (start, end)
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleBooking {
    pub booking_id: String,
    pub booked_by: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleUnit {
    pub unit_id: String,
    pub unit_name: String,
    pub bookings: Vec<ScheduleBooking>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub units: Vec<ScheduleUnit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_window_spans_24_hours() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (start, end) = day_window(date);
        assert_eq!((end - start).num_hours(), 24);
    }
}
