use chrono::NaiveTime;
use shared::Config;
use sqlx::PgPool;

use crate::models::{CreateFacility, CreateFacilityUnit};
use crate::repositories::{FacilityRepository, FacilityUnitRepository};

/// Populate a handful of representative facilities for local
/// development and demos. Idempotent in spirit, not in fact: calling
/// it twice creates duplicate rows, which is acceptable for a seed
/// endpoint meant to bootstrap an empty database.
pub async fn seed(pool: &PgPool, config: &Config) -> Result<String, sqlx::Error> {
    let open = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    let close = NaiveTime::from_hms_opt(23, 0, 0).unwrap();

    let courts = FacilityRepository::create(
        pool,
        CreateFacility {
            name: "Courts".to_string(),
            category: "Sport".to_string(),
            description: Some("Indoor multi-sport courts".to_string()),
            total_capacity: 3,
            is_pooled: false,
            min_duration_minutes: config.min_session_minutes,
            max_duration_minutes: 120,
            open_time: open,
            close_time: close,
            timezone: "America/New_York".to_string(),
        },
    )
    .await?;

    for name in ["Court A", "Court B", "Court C"] {
        FacilityUnitRepository::create(
            pool,
            CreateFacilityUnit { facility_id: courts.id, unit_name: name.to_string() },
        )
        .await?;
    }

    FacilityRepository::create(
        pool,
        CreateFacility {
            name: "Study Hall".to_string(),
            category: "Study".to_string(),
            description: Some("Quiet pooled study seating".to_string()),
            total_capacity: 20,
            is_pooled: true,
            min_duration_minutes: config.min_session_minutes,
            max_duration_minutes: 240,
            open_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            timezone: "America/New_York".to_string(),
        },
    )
    .await?;

    let auditorium = FacilityRepository::create(
        pool,
        CreateFacility {
            name: "Main Auditorium".to_string(),
            category: "Event Space".to_string(),
            description: Some("Club-only event space, full-day claims only".to_string()),
            total_capacity: 1,
            is_pooled: false,
            min_duration_minutes: 60,
            max_duration_minutes: 240,
            open_time: open,
            close_time: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
            timezone: "America/New_York".to_string(),
        },
    )
    .await?;

    FacilityUnitRepository::create(
        pool,
        CreateFacilityUnit { facility_id: auditorium.id, unit_name: "Main Floor".to_string() },
    )
    .await?;

    Ok("seeded 3 facilities".to_string())
}
