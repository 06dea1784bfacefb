use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::{error::ApiResult, state::AppState};

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let last_cleanup_run_at = *state.last_cleanup_run_at.read().unwrap();

    let database = if database_ok { "up" } else { "down" };

    let body = json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "checks": {
            "database": database,
        },
        "lastCleanupRunAt": last_cleanup_run_at,
        "serverTime": Utc::now(),
    });

    let status = if database_ok {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body))
}

pub async fn seed(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let message = db::seed::seed(&state.pool, &state.config)
        .await
        .map_err(|e| shared::AppError::Database(e.to_string()))?;
    Ok(Json(json!({ "message": message })))
}

/// Observers refetch authoritative state on receipt of the coarse
/// `state_changed` event; this stream carries no payload.
pub async fn events(State(state): State<AppState>) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|msg| msg.ok().map(|_| Ok(Event::default().event("state_changed").data(""))));

    Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::new().interval(Duration::from_secs(15)))
}
