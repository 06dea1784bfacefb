use chrono::{DateTime, Utc};
use domain::{BookingStatus as CoreBookingStatus, BookingType as CoreBookingType, UserType as CoreUserType};
use serde::{Deserialize, Serialize};
use shared::{BookingId, FacilityId, FacilityUnitId};
use sqlx::FromRow;

/// Postgres-mapped mirror of [`domain::UserType`]. Kept distinct from
/// the domain enum because the domain crate has no sqlx dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "snake_case")]
pub enum UserType {
    Individual,
    Club,
}

impl From<UserType> for CoreUserType {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Individual => CoreUserType::Individual,
            UserType::Club => CoreUserType::Club,
        }
    }
}

impl From<CoreUserType> for UserType {
    fn from(value: CoreUserType) -> Self {
        match value {
            CoreUserType::Individual => UserType::Individual,
            CoreUserType::Club => UserType::Club,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_type", rename_all = "snake_case")]
pub enum BookingType {
    TimeBased,
    FullDay,
}

impl From<BookingType> for CoreBookingType {
    fn from(value: BookingType) -> Self {
        match value {
            BookingType::TimeBased => CoreBookingType::TimeBased,
            BookingType::FullDay => CoreBookingType::FullDay,
        }
    }
}

impl From<CoreBookingType> for BookingType {
    fn from(value: CoreBookingType) -> Self {
        match value {
            CoreBookingType::TimeBased => BookingType::TimeBased,
            CoreBookingType::FullDay => BookingType::FullDay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Released,
}

impl From<BookingStatus> for CoreBookingStatus {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Scheduled => CoreBookingStatus::Scheduled,
            BookingStatus::CheckedIn => CoreBookingStatus::CheckedIn,
            BookingStatus::Completed => CoreBookingStatus::Completed,
            BookingStatus::Released => CoreBookingStatus::Released,
        }
    }
}

impl From<CoreBookingStatus> for BookingStatus {
    fn from(value: CoreBookingStatus) -> Self {
        match value {
            CoreBookingStatus::Scheduled => BookingStatus::Scheduled,
            CoreBookingStatus::CheckedIn => BookingStatus::CheckedIn,
            CoreBookingStatus::Completed => BookingStatus::Completed,
            CoreBookingStatus::Released => BookingStatus::Released,
        }
    }
}

/// Booking database model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub facility_id: FacilityId,
    pub unit_id: Option<FacilityUnitId>,
    pub booked_by: String,
    pub user_type: UserType,
    pub club_name: Option<String>,
    pub booking_type: BookingType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        CoreBookingStatus::from(self.status).is_active()
    }
}

/// A booking flattened with the facility and unit names it was made
/// against — the shape the per-user listing endpoint returns.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingWithContext {
    pub id: BookingId,
    pub facility_id: FacilityId,
    pub unit_id: Option<FacilityUnitId>,
    pub booked_by: String,
    pub user_type: UserType,
    pub club_name: Option<String>,
    pub booking_type: BookingType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
    pub facility_name: String,
    pub unit_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub facility_id: FacilityId,
    pub unit_id: Option<FacilityUnitId>,
    pub booked_by: String,
    pub user_type: UserType,
    pub club_name: Option<String>,
    pub booking_type: BookingType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub idempotency_key: String,
}
