//! The per-tournament clock aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TournamentId;
use super::blind_schedule::BlindLevel;
use crate::error::ClockError;

/// Where a clock is in its state machine.
///
/// Derived from the `is_running` / `is_paused` flags rather than stored,
/// so the wire format stays the flat flag pair clients already read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Not counting; the initial state and the result of a reset.
    Stopped,
    /// Actively counting down.
    Running,
    /// Held at the current remaining time.
    Paused,
}

/// Authoritative clock state for one tournament.
///
/// `last_update` is the instant up to which `time_remaining_seconds` is
/// accounted for; the engine measures elapsed time from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Tournament this clock belongs to.
    pub tournament_id: TournamentId,
    /// 1-based index into `blind_levels`.
    pub current_level: u32,
    /// Seconds left in the current level.
    pub time_remaining_seconds: u32,
    /// Whether the clock has been started (true while paused as well).
    pub is_running: bool,
    /// Whether the clock is held.
    pub is_paused: bool,
    /// Snapshot of the level sequence this clock runs.
    pub blind_levels: Vec<BlindLevel>,
    /// Identifier of the schedule `blind_levels` came from.
    pub schedule_id: String,
    /// Instant the remaining time was last brought up to date.
    ///
    /// A running tick advances this by whole elapsed seconds only, so it can
    /// trail the instant of the broadcast by up to a second; the fraction is
    /// consumed by the next tick. Control operations and level advances set
    /// it to the current instant.
    pub last_update: DateTime<Utc>,
}

impl TimerState {
    /// A stopped clock at level 1 with the level's full duration.
    #[must_use]
    pub fn new(
        tournament_id: TournamentId,
        schedule_id: String,
        blind_levels: Vec<BlindLevel>,
        now: DateTime<Utc>,
    ) -> Self {
        let time_remaining_seconds = blind_levels
            .first()
            .map_or(0, BlindLevel::duration_seconds);
        Self {
            tournament_id,
            current_level: 1,
            time_remaining_seconds,
            is_running: false,
            is_paused: false,
            blind_levels,
            schedule_id,
            last_update: now,
        }
    }

    /// Current position in the state machine.
    #[must_use]
    pub const fn status(&self) -> TimerStatus {
        match (self.is_running, self.is_paused) {
            (true, false) => TimerStatus::Running,
            (true, true) => TimerStatus::Paused,
            (false, _) => TimerStatus::Stopped,
        }
    }

    /// Number of levels in the schedule.
    #[must_use]
    pub fn level_count(&self) -> u32 {
        u32::try_from(self.blind_levels.len()).unwrap_or(u32::MAX)
    }

    /// Level at the given 1-based position.
    #[must_use]
    pub fn level_at(&self, level: u32) -> Option<&BlindLevel> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.blind_levels.get(index)
    }

    /// The level currently being played.
    #[must_use]
    pub fn current(&self) -> Option<&BlindLevel> {
        self.level_at(self.current_level)
    }

    /// The level that follows the current one, if any.
    #[must_use]
    pub fn upcoming(&self) -> Option<&BlindLevel> {
        self.level_at(self.current_level.saturating_add(1))
    }

    /// Checks that the state is fit to be shown to clients.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidSchedule`] when the schedule is empty,
    /// the current level lies outside it, or that level has no duration.
    pub fn check_well_formed(&self) -> Result<(), ClockError> {
        if self.blind_levels.is_empty() {
            return Err(ClockError::InvalidSchedule(format!(
                "tournament {} has no blind levels",
                self.tournament_id
            )));
        }
        let Some(level) = self.current() else {
            return Err(ClockError::InvalidSchedule(format!(
                "tournament {} is at level {} of {}",
                self.tournament_id,
                self.current_level,
                self.level_count()
            )));
        };
        if level.duration_minutes == 0 {
            return Err(ClockError::InvalidSchedule(format!(
                "tournament {} level {} has zero duration",
                self.tournament_id, self.current_level
            )));
        }
        Ok(())
    }
}
