//! Read-only timer handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::TimerView;
use crate::app_state::AppState;
use crate::domain::TournamentId;
use crate::error::{ClockError, ErrorResponse};

/// `GET /tournaments/{id}/timer` — Current state of a tournament clock.
///
/// The clock is brought up to date before it is returned, and created on
/// first access like any other clock operation.
///
/// # Errors
///
/// Returns [`ClockError::InvalidSchedule`] if the clock is malformed.
#[utoipa::path(
    get,
    path = "/api/v1/tournaments/{id}/timer",
    tag = "Timers",
    summary = "Get tournament timer",
    description = "Returns the ticked clock with its derived status and the current and upcoming levels.",
    params(("id" = i64, Path, description = "Tournament identifier")),
    responses(
        (status = 200, description = "Timer view", body = TimerView),
        (status = 400, description = "Malformed clock", body = ErrorResponse),
    )
)]
pub async fn get_timer(
    State(state): State<AppState>,
    Path(tournament_id): Path<i64>,
) -> Result<impl IntoResponse, ClockError> {
    let timer = state
        .timer_service
        .sync(TournamentId::new(tournament_id))
        .await?;
    Ok(Json(TimerView::from(&timer)))
}

/// Timer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tournaments/{id}/timer", get(get_timer))
}
