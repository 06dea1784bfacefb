use chrono::{DateTime, NaiveTime, Utc};
use domain::FacilityPolicy;
use serde::{Deserialize, Serialize};
use shared::FacilityId;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub total_capacity: i32,
    pub is_pooled: bool,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl Facility {
    pub fn policy(&self) -> FacilityPolicy {
        FacilityPolicy {
            min_duration_minutes: self.min_duration_minutes,
            max_duration_minutes: self.max_duration_minutes,
            open_time: self.open_time,
            close_time: self.close_time,
        }
    }

    pub fn is_event_space(&self) -> bool {
        self.category == "Event Space"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacility {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub total_capacity: i32,
    pub is_pooled: bool,
    pub min_duration_minutes: i64,
    pub max_duration_minutes: i64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub timezone: String,
}
