use shared::{FacilityId, FacilityUnitId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{CreateFacilityUnit, FacilityUnit};

pub struct FacilityUnitRepository;

impl FacilityUnitRepository {
    pub async fn list_operational(pool: &PgPool, facility_id: FacilityId) -> Result<Vec<FacilityUnit>, sqlx::Error> {
        sqlx::query_as::<_, FacilityUnit>(
            r#"
            SELECT id, facility_id, unit_name, is_operational, created_at
            FROM facility_units
            WHERE facility_id = $1 AND is_operational = TRUE
            ORDER BY unit_name ASC
            "#,
        )
        .bind(facility_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    pub async fn list_all(pool: &PgPool, facility_id: FacilityId) -> Result<Vec<FacilityUnit>, sqlx::Error> {
        sqlx::query_as::<_, FacilityUnit>(
            r#"
            SELECT id, facility_id, unit_name, is_operational, created_at
            FROM facility_units
            WHERE facility_id = $1
            ORDER BY unit_name ASC
            "#,
        )
        .bind(facility_id.as_uuid())
        .fetch_all(pool)
        .await
    }

    /// Lock the unit row; the caller must already hold the facility
    /// lock, preserving the facility-then-unit lock order.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: FacilityUnitId,
    ) -> Result<Option<FacilityUnit>, sqlx::Error> {
        sqlx::query_as::<_, FacilityUnit>(
            r#"
            SELECT id, facility_id, unit_name, is_operational, created_at
            FROM facility_units
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn create(pool: &PgPool, input: CreateFacilityUnit) -> Result<FacilityUnit, sqlx::Error> {
        let id = FacilityUnitId::new();
        sqlx::query_as::<_, FacilityUnit>(
            r#"
            INSERT INTO facility_units (id, facility_id, unit_name)
            VALUES ($1, $2, $3)
            RETURNING id, facility_id, unit_name, is_operational, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(input.facility_id.as_uuid())
        .bind(&input.unit_name)
        .fetch_one(pool)
        .await
    }
}
