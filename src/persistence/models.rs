//! Database models for the timer slice of the tournament record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BlindLevel, TimerState, TournamentId};

/// The columns of a `tournaments` row the clock touches.
///
/// The row itself belongs to the tournament service. The clock writes the
/// `timer_*` columns and `blind_schedule_id` on every save, and reads
/// `custom_blind_levels` without ever writing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimerRow {
    /// Tournament primary key.
    pub id: i64,
    /// Configured schedule (`"custom"` selects `custom_blind_levels`).
    pub blind_schedule_id: Option<String>,
    /// Tournament-owned level sequence as JSONB.
    pub custom_blind_levels: Option<serde_json::Value>,
    /// Persisted 1-based level, `NULL` if the clock never ran.
    pub timer_current_level: Option<i32>,
    /// Persisted remaining seconds, `NULL` if the clock never ran.
    pub timer_time_remaining: Option<i32>,
    /// Persisted running flag.
    pub timer_is_running: bool,
    /// Persisted paused flag.
    pub timer_is_paused: bool,
    /// Instant the persisted remaining time was accurate at.
    pub timer_last_update: Option<DateTime<Utc>>,
}

impl TimerRow {
    /// A tournament row with no clock written yet.
    #[must_use]
    pub fn unstarted(tournament_id: TournamentId, schedule_id: Option<&str>) -> Self {
        Self {
            id: tournament_id.get(),
            blind_schedule_id: schedule_id.map(str::to_string),
            custom_blind_levels: None,
            timer_current_level: None,
            timer_time_remaining: None,
            timer_is_running: false,
            timer_is_paused: false,
            timer_last_update: None,
        }
    }

    /// Tournament this row belongs to.
    #[must_use]
    pub const fn tournament_id(&self) -> TournamentId {
        TournamentId::new(self.id)
    }

    /// Decodes the tournament-owned level sequence, if any.
    ///
    /// Undecodable JSON is logged and treated as absent.
    #[must_use]
    pub fn custom_levels(&self) -> Option<Vec<BlindLevel>> {
        let raw = self.custom_blind_levels.as_ref()?;
        match serde_json::from_value::<Vec<BlindLevel>>(raw.clone()) {
            Ok(levels) => Some(levels),
            Err(e) => {
                tracing::warn!(tournament_id = self.id, error = %e, "undecodable custom blind levels");
                None
            }
        }
    }

    /// Applies a snapshot onto this row.
    pub fn apply(&mut self, snapshot: &TimerSnapshot) {
        self.blind_schedule_id = Some(snapshot.schedule_id.clone());
        self.timer_current_level = Some(snapshot.current_level);
        self.timer_time_remaining = Some(snapshot.time_remaining_seconds);
        self.timer_is_running = snapshot.is_running;
        self.timer_is_paused = snapshot.is_paused;
        self.timer_last_update = Some(snapshot.last_update);
    }
}

/// The values written back on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Tournament primary key.
    pub tournament_id: TournamentId,
    /// 1-based level.
    pub current_level: i32,
    /// Remaining seconds in the level.
    pub time_remaining_seconds: i32,
    /// Running flag.
    pub is_running: bool,
    /// Paused flag.
    pub is_paused: bool,
    /// Instant the remaining time is accurate at.
    pub last_update: DateTime<Utc>,
    /// Schedule in effect.
    pub schedule_id: String,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            tournament_id: state.tournament_id,
            current_level: i32::try_from(state.current_level).unwrap_or(i32::MAX),
            time_remaining_seconds: i32::try_from(state.time_remaining_seconds)
                .unwrap_or(i32::MAX),
            is_running: state.is_running,
            is_paused: state.is_paused,
            last_update: state.last_update,
            schedule_id: state.schedule_id.clone(),
        }
    }
}
