//! Persistence gateway: rehydration and best-effort writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::models::{TimerRow, TimerSnapshot};
use super::repository::TimerRepository;
use crate::domain::schedule_catalog;
use crate::domain::{BlindLevel, TimerState, TournamentId};
use crate::error::ClockError;

/// Sits between the clock and its [`TimerRepository`].
///
/// Writes never block the clock: [`PersistenceGateway::save`] spawns the
/// write and logs a failure, so losing one write cannot stop a running
/// countdown. Durable storage is eventually consistent with memory; the
/// periodic sweep heals whatever a failed write left behind.
#[derive(Debug, Clone)]
pub struct PersistenceGateway {
    repository: Arc<dyn TimerRepository>,
}

impl PersistenceGateway {
    /// Wraps a repository.
    #[must_use]
    pub fn new(repository: Arc<dyn TimerRepository>) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn TimerRepository> {
        &self.repository
    }

    /// Rebuilds a tournament's clock from durable storage.
    ///
    /// Returns `None` when the tournament has never had a clock written. A
    /// clock persisted as running has the time since its persisted
    /// timestamp subtracted; crossing a level boundary is left to
    /// [`crate::domain::engine::settle`].
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    pub async fn load(
        &self,
        tournament_id: TournamentId,
        now: DateTime<Utc>,
    ) -> Result<Option<TimerState>, ClockError> {
        let row = self.repository.fetch(tournament_id).await?;
        Ok(row.and_then(|row| rehydrate(&row, now)))
    }

    /// Resolves the level sequence a fresh clock for the tournament uses.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    pub async fn configured_levels(
        &self,
        tournament_id: TournamentId,
    ) -> Result<(String, Vec<BlindLevel>), ClockError> {
        let row = self.repository.fetch(tournament_id).await?;
        let (schedule_id, custom) = match &row {
            Some(row) => (row.blind_schedule_id.as_deref(), row.custom_levels()),
            None => (None, None),
        };
        Ok(schedule_catalog::resolve_levels(schedule_id, custom))
    }

    /// Resolves a schedule a director asked to switch to.
    ///
    /// Only `"custom"` needs storage (the tournament's own levels); catalog
    /// identifiers resolve without a query.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    pub async fn levels_for(
        &self,
        tournament_id: TournamentId,
        schedule_id: &str,
    ) -> Result<(String, Vec<BlindLevel>), ClockError> {
        if schedule_id != schedule_catalog::CUSTOM_SCHEDULE_ID {
            return Ok(schedule_catalog::resolve_levels(Some(schedule_id), None));
        }
        let custom = self
            .repository
            .fetch(tournament_id)
            .await?
            .and_then(|row| row.custom_levels());
        Ok(schedule_catalog::resolve_levels(Some(schedule_id), custom))
    }

    /// Lists tournaments whose clock was left running or paused.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    pub async fn list_active(&self) -> Result<Vec<TournamentId>, ClockError> {
        self.repository.list_active().await
    }

    /// Dispatches a write without waiting for it.
    ///
    /// Must be called from within a Tokio runtime. Failures are logged.
    pub fn save(&self, state: &TimerState) {
        let snapshot = TimerSnapshot::from(state);
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            write(repository.as_ref(), &snapshot).await;
        });
    }

    /// Writes and waits for the result.
    ///
    /// A stale snapshot, or one for a tournament with no row, is dropped
    /// without error.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    pub async fn save_now(&self, state: &TimerState) -> Result<(), ClockError> {
        let snapshot = TimerSnapshot::from(state);
        let applied = self.repository.store(&snapshot).await?;
        if !applied {
            tracing::debug!(
                tournament_id = %snapshot.tournament_id,
                "timer write not applied: stale snapshot or no tournament row"
            );
        }
        Ok(())
    }
}

async fn write(repository: &dyn TimerRepository, snapshot: &TimerSnapshot) {
    match repository.store(snapshot).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(
                tournament_id = %snapshot.tournament_id,
                "timer write not applied: stale snapshot or no tournament row"
            );
        }
        Err(e) => {
            tracing::warn!(
                tournament_id = %snapshot.tournament_id,
                error = %e,
                "timer write failed; next sweep will retry"
            );
        }
    }
}

/// Turns a stored row into a live clock as of `now`.
///
/// Returns `None` when the row carries no clock. A paused flag without the
/// running flag is read as paused. An out-of-range level is clamped into
/// the schedule.
#[must_use]
pub fn rehydrate(row: &TimerRow, now: DateTime<Utc>) -> Option<TimerState> {
    let tournament_id = row.tournament_id();
    let level = row.timer_current_level?;
    let remaining = row.timer_time_remaining?;

    let (schedule_id, levels) =
        schedule_catalog::resolve_levels(row.blind_schedule_id.as_deref(), row.custom_levels());

    let mut state = TimerState::new(tournament_id, schedule_id, levels, now);
    let last = state.level_count().max(1);
    let clamped = u32::try_from(level.max(1)).unwrap_or(1).min(last);
    if i64::from(clamped) != i64::from(level) {
        tracing::warn!(%tournament_id, level, clamped, "persisted level outside schedule");
    }

    state.current_level = clamped;
    state.time_remaining_seconds = u32::try_from(remaining.max(0)).unwrap_or(0);
    state.is_paused = row.timer_is_paused;
    state.is_running = row.timer_is_running || row.timer_is_paused;

    let persisted_at = row.timer_last_update.unwrap_or(now);
    if state.is_running && !state.is_paused && persisted_at < now {
        let elapsed = (now - persisted_at).num_seconds().max(0);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        state.time_remaining_seconds = state.time_remaining_seconds.saturating_sub(elapsed);
        state.last_update = persisted_at + chrono::Duration::seconds(i64::from(elapsed));
    } else {
        state.last_update = now;
    }

    Some(state)
}
