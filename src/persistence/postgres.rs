//! PostgreSQL implementation of the timer repository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{TimerRow, TimerSnapshot};
use super::repository::TimerRepository;
use crate::domain::TournamentId;
use crate::error::ClockError;

/// PostgreSQL-backed repository using `sqlx::PgPool`.
///
/// Reads and writes the clock columns of the `tournaments` table. Rows are
/// created by the tournament service; a save for an id with no row changes
/// nothing.
#[derive(Debug, Clone)]
pub struct PostgresTimerRepository {
    pool: PgPool,
}

impl PostgresTimerRepository {
    /// Creates a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimerRepository for PostgresTimerRepository {
    async fn fetch(&self, tournament_id: TournamentId) -> Result<Option<TimerRow>, ClockError> {
        let row = sqlx::query_as::<_, TimerRow>(
            "SELECT id, blind_schedule_id, custom_blind_levels, timer_current_level, \
             timer_time_remaining, timer_is_running, timer_is_paused, timer_last_update \
             FROM tournaments WHERE id = $1",
        )
        .bind(tournament_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn store(&self, snapshot: &TimerSnapshot) -> Result<bool, ClockError> {
        let result = sqlx::query(
            "UPDATE tournaments SET \
               blind_schedule_id = $2, \
               timer_current_level = $3, \
               timer_time_remaining = $4, \
               timer_is_running = $5, \
               timer_is_paused = $6, \
               timer_last_update = $7 \
             WHERE id = $1 \
               AND (timer_last_update IS NULL OR timer_last_update <= $7)",
        )
        .bind(snapshot.tournament_id.get())
        .bind(&snapshot.schedule_id)
        .bind(snapshot.current_level)
        .bind(snapshot.time_remaining_seconds)
        .bind(snapshot.is_running)
        .bind(snapshot.is_paused)
        .bind(snapshot.last_update)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self) -> Result<Vec<TournamentId>, ClockError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM tournaments \
             WHERE timer_is_running OR timer_is_paused ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(TournamentId::new).collect())
    }
}
