use chrono::{DateTime, Utc};
use domain::{available_capacity, current_status, ActiveBookingSummary, ActiveOccupant, AssetAvailability};
use shared::CoreError;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct AvailabilityRow {
    id: Uuid,
    name: String,
    category: String,
    description: Option<String>,
    total_capacity: i32,
    is_pooled: bool,
    current_usage: i64,
    occupants: Option<serde_json::Value>,
    my_booking_id: Option<Uuid>,
    my_booking_starts_at: Option<DateTime<Utc>>,
    my_booking_ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Deserialize)]
struct OccupantRow {
    booking_id: Uuid,
    unit_name: Option<String>,
    booked_by: String,
    user_type: domain::UserType,
    club_name: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

pub struct AvailabilityRepository;

impl AvailabilityRepository {
    /// Single-statement projection of every facility's live occupancy,
    /// the caller's next active claim on it, and who currently holds it.
    pub async fn get_all_assets(
        pool: &PgPool,
        caller_name: Option<&str>,
        caller_user_type: Option<domain::UserType>,
    ) -> Result<Vec<AssetAvailability>, CoreError> {
        let now = Utc::now();
        let caller_type_str = caller_user_type.map(|t| t.to_string());

        let rows: Vec<AvailabilityRow> = sqlx::query_as(
            r#"
            WITH usage AS (
                SELECT
                    b.facility_id,
                    CASE WHEN f.is_pooled THEN COUNT(*) ELSE COUNT(DISTINCT b.unit_id) END AS current_usage
                FROM bookings b
                JOIN facilities f ON f.id = b.facility_id
                WHERE b.status IN ('scheduled', 'checked_in')
                  AND b.starts_at <= $2 AND b.ends_at > $2
                GROUP BY b.facility_id
            ),
            occupants AS (
                SELECT
                    b.facility_id,
                    json_agg(json_build_object(
                        'booking_id', b.id,
                        'unit_name', u.unit_name,
                        'booked_by', b.booked_by,
                        'user_type', b.user_type,
                        'club_name', b.club_name,
                        'starts_at', b.starts_at,
                        'ends_at', b.ends_at
                    ) ORDER BY b.starts_at) AS occupants
                FROM bookings b
                LEFT JOIN facility_units u ON u.id = b.unit_id
                WHERE b.status IN ('scheduled', 'checked_in')
                  AND b.starts_at <= $2 AND b.ends_at > $2
                GROUP BY b.facility_id
            ),
            my_booking AS (
                SELECT DISTINCT ON (b.facility_id)
                    b.facility_id, b.id AS booking_id, b.starts_at, b.ends_at
                FROM bookings b
                WHERE b.booked_by = $1
                  AND b.status IN ('scheduled', 'checked_in')
                  AND b.ends_at > $2
                ORDER BY b.facility_id, b.starts_at ASC
            )
            SELECT
                f.id, f.name, f.category, f.description, f.total_capacity, f.is_pooled,
                COALESCE(usage.current_usage, 0) AS current_usage,
                occupants.occupants,
                my_booking.booking_id AS my_booking_id,
                my_booking.starts_at AS my_booking_starts_at,
                my_booking.ends_at AS my_booking_ends_at
            FROM facilities f
            LEFT JOIN usage ON usage.facility_id = f.id
            LEFT JOIN occupants ON occupants.facility_id = f.id
            LEFT JOIN my_booking ON my_booking.facility_id = f.id
            ORDER BY f.category ASC, f.name ASC
            "#,
        )
        .bind(caller_name.unwrap_or(""))
        .bind(now)
        .bind(caller_type_str)
        .fetch_all(pool)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

        rows.into_iter()
            .filter(|row| domain::is_facility_visible(&row.category, caller_user_type))
            .map(row_to_asset)
            .collect()
    }
}

fn row_to_asset(row: AvailabilityRow) -> Result<AssetAvailability, CoreError> {
    let current_usage = row.current_usage as i32;
    let cap = available_capacity(row.total_capacity, current_usage);

    let active_occupants = match row.occupants {
        Some(value) => serde_json::from_value::<Vec<OccupantRow>>(value)
            .map_err(|e| CoreError::Internal(format!("malformed occupant projection: {e}")))?
            .into_iter()
            .map(|o| ActiveOccupant {
                booking_id: o.booking_id.to_string(),
                unit_name: o.unit_name,
                booked_by: o.booked_by,
                user_type: o.user_type,
                club_name: o.club_name,
                starts_at: o.starts_at,
                ends_at: o.ends_at,
            })
            .collect(),
        None => Vec::new(),
    };

    let my_active_booking = row.my_booking_id.map(|id| ActiveBookingSummary {
        booking_id: id.to_string(),
        starts_at: row.my_booking_starts_at.expect("starts_at present alongside booking id"),
        ends_at: row.my_booking_ends_at.expect("ends_at present alongside booking id"),
    });

    Ok(AssetAvailability {
        facility_id: row.id.to_string(),
        name: row.name,
        category: row.category,
        description: row.description,
        total_capacity: row.total_capacity,
        is_pooled: row.is_pooled,
        current_usage,
        available_capacity: cap,
        current_status: current_status(cap),
        my_active_booking,
        active_occupants,
    })
}
