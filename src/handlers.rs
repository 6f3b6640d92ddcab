use crate::errors::AppError;
use crate::models::{
    ActivityQuery, ActivityResponse, DashboardResponse, ElapsedResponse, RestaurantCount,
    RestaurantsQuery, YearResponse,
};
use crate::ranking::{YEAR_TOP, top_restaurants};
use crate::state::AppState;
use crate::stats::{RECENT_DAYS, build_activity_at, build_dashboard, build_year_at};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};

const MAX_ACTIVITY_DAYS: u32 = 366;
const MAX_RESTAURANTS: usize = 50;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = build_dashboard(&state.orders);
    Html(render_index(&dashboard))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(build_dashboard(&state.orders))
}

pub async fn get_elapsed(State(state): State<AppState>) -> Json<ElapsedResponse> {
    let snapshot = ElapsedResponse::clone(&state.elapsed.borrow());
    Json(snapshot)
}

pub async fn get_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivityResponse>, AppError> {
    let days = query.days.unwrap_or(RECENT_DAYS);
    if !(1..=MAX_ACTIVITY_DAYS).contains(&days) {
        return Err(AppError::bad_request(format!(
            "days must be between 1 and {MAX_ACTIVITY_DAYS}"
        )));
    }

    Ok(Json(build_activity_at(&state.orders, today(), days)))
}

pub async fn get_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearResponse>, AppError> {
    build_year_at(&state.orders, year, today())
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("year {year} is out of range")))
}

pub async fn get_restaurants(
    State(state): State<AppState>,
    Query(query): Query<RestaurantsQuery>,
) -> Result<Json<Vec<RestaurantCount>>, AppError> {
    let limit = query.limit.unwrap_or(YEAR_TOP);
    if !(1..=MAX_RESTAURANTS).contains(&limit) {
        return Err(AppError::bad_request(format!(
            "limit must be between 1 and {MAX_RESTAURANTS}"
        )));
    }

    Ok(Json(top_restaurants(&state.orders, query.year, limit)))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
