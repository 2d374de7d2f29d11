//! Per-connection room membership.
//!
//! Tracks which tournament rooms a WebSocket client has joined and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::TournamentId;

/// The set of rooms a single WebSocket connection belongs to.
#[derive(Debug, Default)]
pub struct RoomMembership {
    rooms: HashSet<TournamentId>,
}

impl RoomMembership {
    /// Creates a membership with no rooms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a room. Returns `false` if already a member.
    pub fn join(&mut self, tournament_id: TournamentId) -> bool {
        self.rooms.insert(tournament_id)
    }

    /// Leaves a room. Returns `false` if not a member.
    pub fn leave(&mut self, tournament_id: TournamentId) -> bool {
        self.rooms.remove(&tournament_id)
    }

    /// Returns `true` if events for `tournament_id` should be delivered.
    #[must_use]
    pub fn contains(&self, tournament_id: TournamentId) -> bool {
        self.rooms.contains(&tournament_id)
    }

    /// Returns the number of joined rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no room has been joined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
