//! Concurrent clock storage with per-tournament locking.
//!
//! [`TimerStore`] keeps every live clock in a `HashMap` where each entry is
//! individually protected by a [`tokio::sync::Mutex`]. Mutations of one
//! tournament's clock are serialized; different tournaments proceed
//! concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::{TimerState, TournamentId};

/// Shared handle to one tournament's clock.
///
/// Every caller that asks for the same tournament gets a clone of the same
/// handle, so a mutation made under the lock is visible to all of them.
pub type TimerHandle = Arc<Mutex<TimerState>>;

/// In-memory source of truth for every live clock.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<Mutex<TimerState>>` so that read-modify-write on one clock cannot
/// interleave.
#[derive(Debug, Default)]
pub struct TimerStore {
    timers: RwLock<HashMap<TournamentId, TimerHandle>>,
}

impl TimerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for a tournament, if it is loaded.
    pub async fn get(&self, tournament_id: TournamentId) -> Option<TimerHandle> {
        self.timers.read().await.get(&tournament_id).map(Arc::clone)
    }

    /// Inserts a clock unless one is already loaded for the tournament.
    ///
    /// Returns the handle now in the store and whether `state` was the one
    /// inserted. A caller that lost a creation race adopts the winner.
    pub async fn insert_if_absent(&self, state: TimerState) -> (TimerHandle, bool) {
        let mut map = self.timers.write().await;
        if let Some(existing) = map.get(&state.tournament_id) {
            return (Arc::clone(existing), false);
        }
        let tournament_id = state.tournament_id;
        let handle = Arc::new(Mutex::new(state));
        map.insert(tournament_id, Arc::clone(&handle));
        (handle, true)
    }

    /// Installs a clock, replacing whatever was loaded for the tournament.
    ///
    /// Recovery uses this before the server accepts connections.
    pub async fn seed(&self, state: TimerState) -> TimerHandle {
        let tournament_id = state.tournament_id;
        let handle = Arc::new(Mutex::new(state));
        self.timers
            .write()
            .await
            .insert(tournament_id, Arc::clone(&handle));
        handle
    }

    /// Returns every loaded clock, ordered by tournament.
    pub async fn handles(&self) -> Vec<(TournamentId, TimerHandle)> {
        let map = self.timers.read().await;
        let mut handles: Vec<_> = map.iter().map(|(id, h)| (*id, Arc::clone(h))).collect();
        handles.sort_by_key(|(id, _)| *id);
        handles
    }

    /// Returns the number of loaded clocks.
    pub async fn len(&self) -> usize {
        self.timers.read().await.len()
    }

    /// Returns `true` if no clock is loaded.
    pub async fn is_empty(&self) -> bool {
        self.timers.read().await.is_empty()
    }
}
