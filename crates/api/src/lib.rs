pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the application router.
pub fn create_app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let allow_origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    let cors = CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/assets", get(routes::assets::get_assets))
        .route("/facilities/:id/units", get(routes::facilities::list_units))
        .route("/facilities/:id/schedule", get(routes::facilities::get_schedule))
        .route("/reserve", post(routes::bookings::reserve))
        .route("/check-in", post(routes::bookings::check_in))
        .route("/check-out", post(routes::bookings::check_out))
        .route("/cancel", post(routes::bookings::cancel))
        .route("/bookings/user/:user_name", get(routes::bookings::list_for_user))
        .route("/system/health", get(routes::system::health))
        .route("/system/seed", post(routes::system::seed))
        .route("/system/events", get(routes::system::events))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
