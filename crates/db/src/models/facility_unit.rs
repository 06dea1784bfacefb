use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{FacilityId, FacilityUnitId};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FacilityUnit {
    pub id: FacilityUnitId,
    pub facility_id: FacilityId,
    pub unit_name: String,
    pub is_operational: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacilityUnit {
    pub facility_id: FacilityId,
    pub unit_name: String,
}
