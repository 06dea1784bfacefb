use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Extra context surfaced alongside a booking conflict, so a caller can
/// show "taken by Roobooru until 17:00" instead of a bare 409.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictDetails {
    pub booked_by: Option<String>,
    pub club_name: Option<String>,
    pub user_type: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl ConflictDetails {
    pub fn club(club_name: impl Into<String>, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        Self {
            booked_by: None,
            club_name: Some(club_name.into()),
            user_type: Some("club".to_string()),
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
        }
    }

    pub fn incumbent(
        booked_by: impl Into<String>,
        user_type: impl Into<String>,
        club_name: Option<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            booked_by: Some(booked_by.into()),
            club_name,
            user_type: Some(user_type.into()),
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
        }
    }
}

/// Business-logic errors raised by the booking coordination core.
///
/// Every failure the policy evaluator, booking service, or reconciler
/// produces fits one of these kinds. The HTTP boundary is the only
/// place that maps a kind to a status code.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Conflict {
        message: String,
        details: Option<ConflictDetails>,
    },

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            details: None,
        }
    }

    pub fn conflict_with(message: impl Into<String>, details: ConflictDetails) -> Self {
        Self::Conflict {
            message: message.into(),
            details: Some(details),
        }
    }
}
