//! Timer view DTO for `GET /tournaments/{id}/timer`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BlindLevel, TimerState, TimerStatus, TournamentId};

/// Display-oriented view of a tournament clock.
///
/// Carries the same flags as the WebSocket state plus the derived status
/// and the current and upcoming levels, so a dashboard does not have to
/// index the schedule itself.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    /// Tournament identifier.
    pub tournament_id: TournamentId,
    /// Derived state machine position.
    pub status: TimerStatus,
    /// 1-based current level.
    pub current_level: u32,
    /// Number of levels in the schedule.
    pub level_count: u32,
    /// Seconds left in the current level.
    pub time_remaining_seconds: u32,
    /// Raw running flag.
    pub is_running: bool,
    /// Raw paused flag.
    pub is_paused: bool,
    /// Schedule in effect.
    pub schedule_id: String,
    /// The level being played.
    pub current: Option<BlindLevel>,
    /// The level after this one, if any.
    pub upcoming: Option<BlindLevel>,
    /// Instant the remaining time was last brought up to date.
    pub last_update: DateTime<Utc>,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            tournament_id: state.tournament_id,
            status: state.status(),
            current_level: state.current_level,
            level_count: state.level_count(),
            time_remaining_seconds: state.time_remaining_seconds,
            is_running: state.is_running,
            is_paused: state.is_paused,
            schedule_id: state.schedule_id.clone(),
            current: state.current().cloned(),
            upcoming: state.upcoming().cloned(),
            last_update: state.last_update,
        }
    }
}
