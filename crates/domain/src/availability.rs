use crate::booking::UserType;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// `max(0, total_capacity - current_usage)`.
pub fn available_capacity(total_capacity: i32, current_usage: i32) -> i32 {
    (total_capacity - current_usage).max(0)
}

pub fn current_status(available_capacity: i32) -> &'static str {
    if available_capacity > 0 {
        "available"
    } else {
        "in_use"
    }
}

/// Whether an "Event Space" category facility should be visible to this
/// caller. Every other category is always visible.
pub fn is_facility_visible(category: &str, caller_user_type: Option<UserType>) -> bool {
    if category != "Event Space" {
        return true;
    }
    matches!(caller_user_type, Some(UserType::Club))
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveOccupant {
    pub booking_id: String,
    pub unit_name: Option<String>,
    pub booked_by: String,
    pub user_type: UserType,
    pub club_name: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetAvailability {
    pub facility_id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub total_capacity: i32,
    pub is_pooled: bool,
    pub current_usage: i32,
    pub available_capacity: i32,
    pub current_status: &'static str,
    pub my_active_booking: Option<ActiveBookingSummary>,
    pub active_occupants: Vec<ActiveOccupant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveBookingSummary {
    pub booking_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_capacity_never_negative() {
        assert_eq!(available_capacity(3, 5), 0);
        assert_eq!(available_capacity(3, 1), 2);
    }

    #[test]
    fn status_flips_at_zero() {
        assert_eq!(current_status(0), "in_use");
        assert_eq!(current_status(1), "available");
    }

    #[test]
    fn event_space_hidden_from_individuals() {
        assert!(!is_facility_visible("Event Space", Some(UserType::Individual)));
        assert!(!is_facility_visible("Event Space", None));
        assert!(is_facility_visible("Event Space", Some(UserType::Club)));
        assert!(is_facility_visible("Courts", Some(UserType::Individual)));
    }
}
