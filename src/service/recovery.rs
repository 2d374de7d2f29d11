//! Startup recovery of clocks left running or paused.

use chrono::Utc;

use super::TimerService;
use crate::domain::{TournamentId, engine};
use crate::error::ClockError;

/// Outcome of [`recover_timers`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Tournaments whose clock is back in memory.
    pub recovered: Vec<TournamentId>,
    /// Tournaments that could not be restored. Their clock is loaded again
    /// on first access; until a load succeeds nothing is written for them.
    pub failed: Vec<TournamentId>,
}

/// Restores every clock that was running or paused when the process last
/// stopped.
///
/// Each tournament is restored independently: a corrupt or unreadable
/// record is logged and skipped without affecting the others. Run this
/// before the server accepts connections so that no client sees a clock
/// that is about to be replaced.
///
/// # Errors
///
/// Returns [`ClockError::PersistenceError`] only if the list of active
/// tournaments cannot be read at all.
pub async fn recover_timers(service: &TimerService) -> Result<RecoveryReport, ClockError> {
    let active = service.persistence().list_active().await?;
    let mut report = RecoveryReport::default();

    for tournament_id in active {
        let now = Utc::now();
        match service.persistence().load(tournament_id, now).await {
            Ok(Some(mut state)) => {
                let advanced = engine::settle(&mut state, now);
                tracing::info!(
                    %tournament_id,
                    level = state.current_level,
                    remaining = state.time_remaining_seconds,
                    status = ?state.status(),
                    advanced,
                    "timer recovered"
                );
                service.persistence().save(&state);
                service.store().seed(state).await;
                report.recovered.push(tournament_id);
            }
            Ok(None) => {
                tracing::warn!(%tournament_id, "active tournament has no timer columns");
                report.failed.push(tournament_id);
            }
            Err(e) => {
                tracing::error!(%tournament_id, error = %e, "timer recovery failed");
                report.failed.push(tournament_id);
            }
        }
    }

    tracing::info!(
        recovered = report.recovered.len(),
        failed = report.failed.len(),
        "timer recovery complete"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::engine::MAX_SET_TIME_SECONDS;
    use crate::domain::{EventBus, TimerStatus, TimerStore};
    use crate::persistence::models::TimerRow;
    use crate::persistence::{InMemoryTimerRepository, PersistenceGateway, TimerRepository};

    fn make_service(repo: &Arc<InMemoryTimerRepository>) -> TimerService {
        TimerService::new(
            Arc::new(TimerStore::new()),
            PersistenceGateway::new(Arc::clone(repo) as Arc<dyn TimerRepository>),
            EventBus::new(16),
            MAX_SET_TIME_SECONDS,
        )
    }

    fn row(id: i64, level: i32, remaining: i32, running: bool, paused: bool) -> TimerRow {
        let mut row = TimerRow::unstarted(TournamentId::new(id), Some("standard"));
        row.timer_current_level = Some(level);
        row.timer_time_remaining = Some(remaining);
        row.timer_is_running = running;
        row.timer_is_paused = paused;
        row.timer_last_update = Some(Utc::now() - Duration::seconds(45));
        row
    }

    #[tokio::test]
    async fn running_clock_resumes_with_the_gap_subtracted() {
        let repo = Arc::new(InMemoryTimerRepository::new());
        repo.put_row(row(1, 2, 100, true, false)).await;
        let service = make_service(&repo);

        let Ok(report) = recover_timers(&service).await else {
            panic!("recovery should succeed");
        };
        assert_eq!(report.recovered, vec![TournamentId::new(1)]);
        assert!(report.failed.is_empty());

        let Some(handle) = service.store().get(TournamentId::new(1)).await else {
            panic!("clock should be seeded");
        };
        let state = handle.lock().await;
        assert_eq!(state.current_level, 2);
        assert!((54..=55).contains(&state.time_remaining_seconds));
        assert_eq!(state.status(), TimerStatus::Running);
    }

    #[tokio::test]
    async fn paused_clock_keeps_its_time() {
        let repo = Arc::new(InMemoryTimerRepository::new());
        repo.put_row(row(2, 3, 100, true, true)).await;
        let service = make_service(&repo);

        let _ = recover_timers(&service).await;

        let Some(handle) = service.store().get(TournamentId::new(2)).await else {
            panic!("clock should be seeded");
        };
        let state = handle.lock().await;
        assert_eq!(state.time_remaining_seconds, 100);
        assert_eq!(state.status(), TimerStatus::Paused);
    }

    #[tokio::test]
    async fn stopped_clocks_are_left_for_lazy_loading() {
        let repo = Arc::new(InMemoryTimerRepository::new());
        repo.put_row(row(3, 1, 1200, false, false)).await;
        let service = make_service(&repo);

        let Ok(report) = recover_timers(&service).await else {
            panic!("recovery should succeed");
        };
        assert!(report.recovered.is_empty());
        assert!(service.store().is_empty().await);
    }

    #[tokio::test]
    async fn one_bad_record_does_not_block_the_rest() {
        let repo = Arc::new(InMemoryTimerRepository::new());
        repo.put_row(row(1, 2, 100, true, false)).await;
        repo.put_row(row(2, 4, 300, true, false)).await;
        repo.put_row(row(3, 1, 50, true, true)).await;
        repo.make_unavailable(TournamentId::new(2)).await;
        let service = make_service(&repo);

        let Ok(report) = recover_timers(&service).await else {
            panic!("recovery should succeed");
        };
        assert_eq!(report.recovered, vec![TournamentId::new(1), TournamentId::new(3)]);
        assert_eq!(report.failed, vec![TournamentId::new(2)]);
        assert_eq!(service.store().len().await, 2);

        let _ = service.persist_all().await;
        repo.make_available(TournamentId::new(2)).await;
        assert_eq!(
            repo.row(TournamentId::new(2)).await.and_then(|r| r.timer_current_level),
            Some(4)
        );
        let Ok(state) = service.sync(TournamentId::new(2)).await else {
            panic!("failed clock should load once storage is back");
        };
        assert_eq!(state.current_level, 4);
        assert_eq!(state.status(), TimerStatus::Running);
    }
}
