//! Room-scoped events published on every clock change.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{TimerState, TournamentId};

/// A fresh clock snapshot for one tournament's room.
///
/// The snapshot sits behind an [`Arc`] because the broadcast channel clones
/// the event once per connected receiver.
#[derive(Debug, Clone)]
pub struct TimerEvent {
    /// Room the event belongs to.
    pub tournament_id: TournamentId,
    /// State after the change.
    pub state: Arc<TimerState>,
    /// When the event was published.
    pub published_at: DateTime<Utc>,
}

impl TimerEvent {
    /// Wire name of the event.
    pub const NAME: &'static str = "timer:update";

    /// Wraps a snapshot for publication.
    #[must_use]
    pub fn update(state: TimerState) -> Self {
        Self {
            tournament_id: state.tournament_id,
            state: Arc::new(state),
            published_at: Utc::now(),
        }
    }
}
