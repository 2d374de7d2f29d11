//! In-memory timer repository.
//!
//! Used when `PERSISTENCE_ENABLED=false` and by tests. Mirrors the
//! PostgreSQL semantics, including the stale-write guard.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{TimerRow, TimerSnapshot};
use super::repository::TimerRepository;
use crate::domain::TournamentId;
use crate::error::ClockError;

/// Repository backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryTimerRepository {
    rows: RwLock<HashMap<TournamentId, TimerRow>>,
    unavailable: RwLock<HashSet<TournamentId>>,
}

impl InMemoryTimerRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a whole row, as the tournament service would.
    pub async fn put_row(&self, row: TimerRow) {
        self.rows.write().await.insert(row.tournament_id(), row);
    }

    /// Returns a copy of a stored row.
    pub async fn row(&self, tournament_id: TournamentId) -> Option<TimerRow> {
        self.rows.read().await.get(&tournament_id).cloned()
    }

    /// Makes every operation touching `tournament_id` fail, simulating a
    /// corrupt or unreachable record.
    pub async fn make_unavailable(&self, tournament_id: TournamentId) {
        self.unavailable.write().await.insert(tournament_id);
    }

    /// Undoes [`InMemoryTimerRepository::make_unavailable`].
    pub async fn make_available(&self, tournament_id: TournamentId) {
        self.unavailable.write().await.remove(&tournament_id);
    }

    async fn check_available(&self, tournament_id: TournamentId) -> Result<(), ClockError> {
        if self.unavailable.read().await.contains(&tournament_id) {
            return Err(ClockError::PersistenceError(format!(
                "record for tournament {tournament_id} is unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TimerRepository for InMemoryTimerRepository {
    async fn fetch(&self, tournament_id: TournamentId) -> Result<Option<TimerRow>, ClockError> {
        self.check_available(tournament_id).await?;
        Ok(self.row(tournament_id).await)
    }

    async fn store(&self, snapshot: &TimerSnapshot) -> Result<bool, ClockError> {
        self.check_available(snapshot.tournament_id).await?;
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(&snapshot.tournament_id) else {
            return Ok(false);
        };

        if row
            .timer_last_update
            .is_some_and(|stored| stored > snapshot.last_update)
        {
            return Ok(false);
        }
        row.apply(snapshot);
        Ok(true)
    }

    async fn list_active(&self) -> Result<Vec<TournamentId>, ClockError> {
        let rows = self.rows.read().await;
        let mut ids: Vec<TournamentId> = rows
            .values()
            .filter(|row| row.timer_is_running || row.timer_is_paused)
            .map(TimerRow::tournament_id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}
