//! Blind schedule catalog handlers.

use axum::extract::Path;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ScheduleListResponse, ScheduleSummary};
use crate::app_state::AppState;
use crate::domain::{BlindSchedule, schedule_catalog};

/// `GET /schedules` — List the preset blind schedules.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    tag = "Schedules",
    summary = "List blind schedules",
    description = "Returns every preset schedule a tournament can run.",
    responses(
        (status = 200, description = "Schedule catalog", body = ScheduleListResponse),
    )
)]
pub async fn list_schedules() -> impl IntoResponse {
    let data = schedule_catalog::list()
        .iter()
        .map(ScheduleSummary::from)
        .collect();
    Json(ScheduleListResponse { data })
}

/// `GET /schedules/{id}` — Get a schedule with all of its levels.
///
/// Unknown identifiers resolve to the standard schedule, as they do when a
/// clock is created.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}",
    tag = "Schedules",
    summary = "Get blind schedule",
    description = "Returns the schedule and its levels. Unknown identifiers fall back to the standard schedule.",
    params(("id" = String, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Schedule detail", body = BlindSchedule),
    )
)]
pub async fn get_schedule(Path(schedule_id): Path<String>) -> impl IntoResponse {
    Json(schedule_catalog::get_schedule(&schedule_id))
}

/// Schedule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(list_schedules))
        .route("/schedules/{id}", get(get_schedule))
}
