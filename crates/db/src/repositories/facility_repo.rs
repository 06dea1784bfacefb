use shared::FacilityId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{CreateFacility, Facility};

pub struct FacilityRepository;

impl FacilityRepository {
    /// Lock the facility row for the duration of the caller's transaction.
    /// This is always the first lock acquired in the create/check-in/
    /// check-out/cancel paths, establishing a global lock order.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: FacilityId,
    ) -> Result<Option<Facility>, sqlx::Error> {
        sqlx::query_as::<_, Facility>(
            r#"
            SELECT id, name, category, description, total_capacity, is_pooled,
                   min_duration_minutes, max_duration_minutes, open_time, close_time,
                   timezone, created_at
            FROM facilities
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn create(pool: &PgPool, input: CreateFacility) -> Result<Facility, sqlx::Error> {
        let id = FacilityId::new();
        sqlx::query_as::<_, Facility>(
            r#"
            INSERT INTO facilities (id, name, category, description, total_capacity, is_pooled,
                                     min_duration_minutes, max_duration_minutes, open_time, close_time, timezone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, category, description, total_capacity, is_pooled,
                      min_duration_minutes, max_duration_minutes, open_time, close_time,
                      timezone, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.total_capacity)
        .bind(input.is_pooled)
        .bind(input.min_duration_minutes)
        .bind(input.max_duration_minutes)
        .bind(input.open_time)
        .bind(input.close_time)
        .bind(&input.timezone)
        .fetch_one(pool)
        .await
    }
}
