use axum::extract::{Query, State};
use axum::Json;
use db::AvailabilityRepository;
use domain::{AssetAvailability, UserType};
use serde::Deserialize;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AssetsQuery {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    #[serde(rename = "userType")]
    pub user_type: Option<String>,
}

pub async fn get_assets(State(state): State<AppState>, Query(query): Query<AssetsQuery>) -> ApiResult<Json<Vec<AssetAvailability>>> {
    let caller_user_type = match query.user_type.as_deref() {
        Some("club") => Some(UserType::Club),
        Some("individual") => Some(UserType::Individual),
        _ => None,
    };

    let assets = AvailabilityRepository::get_all_assets(&state.pool, query.user_name.as_deref(), caller_user_type).await?;
    Ok(Json(assets))
}
