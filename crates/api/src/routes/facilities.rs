use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use db::{FacilityUnitRepository, ScheduleRepository};
use domain::ScheduleDay;
use serde::{Deserialize, Serialize};
use shared::{CoreError, FacilityId};

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct FacilityUnitResponse {
    pub id: String,
    pub unit_name: String,
    pub is_operational: bool,
}

pub async fn list_units(State(state): State<AppState>, Path(facility_id): Path<String>) -> ApiResult<Json<Vec<FacilityUnitResponse>>> {
    let facility_id: FacilityId = facility_id
        .parse()
        .map_err(|_| CoreError::BadRequest("invalid facility id".into()))?;

    let units = FacilityUnitRepository::list_all(&state.pool, facility_id).await?;
    Ok(Json(
        units
            .into_iter()
            .map(|u| FacilityUnitResponse { id: u.id.to_string(), unit_name: u.unit_name, is_operational: u.is_operational })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: String,
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path(facility_id): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Json<ScheduleDay>> {
    let facility_id: FacilityId = facility_id
        .parse()
        .map_err(|_| CoreError::BadRequest("invalid facility id".into()))?;
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| CoreError::BadRequest("date must be YYYY-MM-DD".into()))?;

    let today = Utc::now().date_naive();
    let last_bookable = today + Duration::days(state.config.max_booking_horizon_days - 1);
    if date < today || date > last_bookable {
        return Err(CoreError::Forbidden("date is outside the booking horizon".into()).into());
    }

    let schedule = ScheduleRepository::get_schedule_for_date(&state.pool, facility_id, date).await?;
    Ok(Json(schedule))
}
