//! Storage abstraction for the timer slice of the tournament record.

use std::fmt;

use async_trait::async_trait;

use super::models::{TimerRow, TimerSnapshot};
use crate::domain::TournamentId;
use crate::error::ClockError;

/// Durable storage for tournament clocks.
///
/// Implementations must ignore a snapshot whose `last_update` is older
/// than the one already stored: saves are dispatched without waiting, so
/// they may land out of order. They must never create a tournament record;
/// a snapshot for an unknown id is dropped.
#[async_trait]
pub trait TimerRepository: Send + Sync + fmt::Debug {
    /// Reads the clock columns of one tournament.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    async fn fetch(&self, tournament_id: TournamentId) -> Result<Option<TimerRow>, ClockError>;

    /// Writes a snapshot. Returns `false` when nothing was written, either
    /// because the snapshot is stale or because the tournament has no row.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    async fn store(&self, snapshot: &TimerSnapshot) -> Result<bool, ClockError>;

    /// Lists tournaments whose clock was left running or paused.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] on storage failure.
    async fn list_active(&self) -> Result<Vec<TournamentId>, ClockError>;
}
