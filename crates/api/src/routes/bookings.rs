use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use db::{Booking, BookingRepository, BookingWithContext, CreateBookingRequest};
use domain::UserType;
use serde::Deserialize;
use shared::{BookingId, CoreError, FacilityId, FacilityUnitId};

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    #[serde(rename = "facilityId")]
    pub facility_id: String,
    #[serde(rename = "unitId")]
    pub unit_id: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "userType")]
    pub user_type: String,
    #[serde(rename = "clubName")]
    pub club_name: Option<String>,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "endsAt")]
    pub ends_at: DateTime<Utc>,
}

pub async fn reserve(State(state): State<AppState>, Json(body): Json<ReserveRequest>) -> ApiResult<(axum::http::StatusCode, Json<Booking>)> {
    let facility_id: FacilityId = body
        .facility_id
        .parse()
        .map_err(|_| CoreError::BadRequest("invalid facilityId".into()))?;
    let unit_id = body
        .unit_id
        .map(|u| u.parse::<FacilityUnitId>())
        .transpose()
        .map_err(|_| CoreError::BadRequest("invalid unitId".into()))?;
    let user_type = match body.user_type.as_str() {
        "individual" => UserType::Individual,
        "club" => UserType::Club,
        _ => return Err(CoreError::BadRequest("userType must be individual or club".into()).into()),
    };

    let booking = state
        .booking_service
        .create(CreateBookingRequest {
            facility_id,
            unit_id,
            user_name: body.user_name,
            user_type,
            club_name: body.club_name,
            starts_at: body.starts_at,
            ends_at: body.ends_at,
        })
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(booking)))
}

#[derive(Debug, Deserialize)]
pub struct BookingActionRequest {
    #[serde(rename = "bookingId")]
    pub booking_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

fn parse_booking_id(raw: &str) -> Result<BookingId, CoreError> {
    raw.parse().map_err(|_| CoreError::BadRequest("invalid bookingId".into()))
}

pub async fn check_in(State(state): State<AppState>, Json(body): Json<BookingActionRequest>) -> ApiResult<Json<Booking>> {
    let booking_id = parse_booking_id(&body.booking_id)?;
    let booking = state.booking_service.check_in(booking_id, &body.user_name).await?;
    Ok(Json(booking))
}

pub async fn check_out(State(state): State<AppState>, Json(body): Json<BookingActionRequest>) -> ApiResult<Json<Booking>> {
    let booking_id = parse_booking_id(&body.booking_id)?;
    let booking = state.booking_service.check_out(booking_id, &body.user_name).await?;
    Ok(Json(booking))
}

pub async fn cancel(State(state): State<AppState>, Json(body): Json<BookingActionRequest>) -> ApiResult<Json<Booking>> {
    let booking_id = parse_booking_id(&body.booking_id)?;
    let booking = state.booking_service.cancel(booking_id, &body.user_name).await?;
    Ok(Json(booking))
}

pub async fn list_for_user(State(state): State<AppState>, Path(user_name): Path<String>) -> ApiResult<Json<Vec<BookingWithContext>>> {
    let bookings = BookingRepository::find_by_user(&state.pool, &user_name).await?;
    Ok(Json(bookings))
}
