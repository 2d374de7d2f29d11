//! Type-safe tournament identifier.
//!
//! [`TournamentId`] wraps the integer primary key of the tournament record
//! owned by the external tournament service, so that timer keys cannot be
//! confused with level numbers or second counts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a tournament whose clock this service runs.
///
/// Used as the key in [`super::TimerStore`], as the room name for
/// WebSocket fan-out, and as the row key in durable storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct TournamentId(i64);

impl TournamentId {
    /// Creates a `TournamentId` from the raw database key.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw database key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TournamentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<TournamentId> for i64 {
    fn from(id: TournamentId) -> Self {
        id.0
    }
}

impl FromStr for TournamentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}
