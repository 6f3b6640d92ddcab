use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/elapsed", get(handlers::get_elapsed))
        .route("/api/activity", get(handlers::get_activity))
        .route("/api/years/:year", get(handlers::get_year))
        .route("/api/restaurants", get(handlers::get_restaurants))
        .with_state(state)
}
