use std::collections::HashSet;

/// Runtime configuration, loaded from the environment at process start.
///
/// Numeric knobs default to the values the booking policy was designed
/// around; only `database_url`, `bind_port`, and `allowed_origins` are
/// expected to vary per deployment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_port: u16,
    pub allowed_origins: Vec<String>,

    pub slot_size_minutes: i64,
    pub no_show_grace_minutes: i64,
    pub max_booking_horizon_days: i64,
    /// Extended booking horizon granted to club identities.
    pub club_booking_horizon_days: i64,
    pub min_session_minutes: i64,
    pub cleanup_tick_seconds: u64,
    pub cleanup_lock_id: i64,
    pub valid_clubs: HashSet<String>,
}

impl Config {
    /// Load from the process environment, applying the design defaults
    /// for anything unset. Panics on a missing `DATABASE_URL` since the
    /// process cannot do anything useful without one.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            bind_port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),

            slot_size_minutes: env_i64("SLOT_SIZE_MINUTES", 30),
            no_show_grace_minutes: env_i64("NO_SHOW_GRACE_MINUTES", 15),
            max_booking_horizon_days: env_i64("MAX_BOOKING_HORIZON_DAYS", 7),
            club_booking_horizon_days: env_i64("CLUB_BOOKING_HORIZON_DAYS", 7),
            min_session_minutes: env_i64("MIN_SESSION_MINUTES", 30),
            cleanup_tick_seconds: env_i64("CLEANUP_TICK_SECONDS", 60) as u64,
            cleanup_lock_id: env_i64("CLEANUP_LOCK_ID", 1001),
            valid_clubs: std::env::var("VALID_CLUBS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(default_clubs),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn default_clubs() -> HashSet<String> {
    ["Roobooru", "Midtown Rowing Club", "Harbor Chess Society"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clubs_nonempty() {
        assert!(!default_clubs().is_empty());
    }
}
