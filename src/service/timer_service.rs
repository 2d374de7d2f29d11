//! Timer service: orchestrates clock operations, persistence, and fan-out.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    EventBus, TimerCommand, TimerEvent, TimerHandle, TimerState, TimerStore, TournamentId, engine,
};
use crate::error::ClockError;
use crate::persistence::PersistenceGateway;

/// A control operation as a director sends it.
///
/// Unlike [`TimerCommand`], a schedule change names only the schedule; the
/// service resolves the levels before taking the clock's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Start the countdown.
    Start,
    /// Hold the countdown.
    Pause,
    /// Continue a held countdown.
    Resume,
    /// Back to level 1, stopped.
    Reset,
    /// Jump forward one level.
    NextLevel,
    /// Jump back one level.
    PrevLevel,
    /// Overwrite the remaining time.
    SetTime {
        /// Requested remaining seconds.
        seconds: i64,
    },
    /// Switch the blind schedule.
    SetSchedule {
        /// Catalog identifier or `"custom"`.
        schedule_id: String,
    },
}

/// Result of one pass of the tick driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Running clocks ticked.
    pub ticked: usize,
    /// Clocks that moved to another level.
    pub advanced: usize,
    /// Updates withheld because the state was malformed.
    pub suppressed: usize,
}

/// Result of one persistence sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Clocks written.
    pub saved: usize,
    /// Clocks whose write failed.
    pub failed: usize,
}

/// Orchestration layer for every clock operation.
///
/// Owns the [`TimerStore`] for state, the [`PersistenceGateway`] for
/// durability and the [`EventBus`] for fan-out. Every mutation follows the
/// pattern: get or create the clock → lock it → apply the engine → dispatch
/// the write → publish the update → release.
#[derive(Debug)]
pub struct TimerService {
    store: Arc<TimerStore>,
    persistence: PersistenceGateway,
    event_bus: EventBus,
    set_time_ceiling: u32,
}

impl TimerService {
    /// Creates a new `TimerService`.
    #[must_use]
    pub fn new(
        store: Arc<TimerStore>,
        persistence: PersistenceGateway,
        event_bus: EventBus,
        set_time_ceiling: u32,
    ) -> Self {
        Self {
            store,
            persistence,
            event_bus,
            set_time_ceiling,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`TimerStore`].
    #[must_use]
    pub fn store(&self) -> &Arc<TimerStore> {
        &self.store
    }

    /// Returns a reference to the inner [`PersistenceGateway`].
    #[must_use]
    pub fn persistence(&self) -> &PersistenceGateway {
        &self.persistence
    }

    /// Returns the tournament's clock, loading or creating it on first use.
    ///
    /// A persisted clock is rehydrated and settled. Otherwise a stopped
    /// clock at level 1 is built from the tournament's configured schedule
    /// and persisted.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] if storage cannot be read.
    /// Nothing is cached in that case, so the next access tries the load
    /// again and the durable copy is never overwritten by a stand-in.
    pub async fn get_or_create(
        &self,
        tournament_id: TournamentId,
    ) -> Result<TimerHandle, ClockError> {
        if let Some(handle) = self.store.get(tournament_id).await {
            return Ok(handle);
        }

        let now = Utc::now();
        let loaded = self.persistence.load(tournament_id, now).await.inspect_err(|e| {
            tracing::warn!(%tournament_id, error = %e, "timer rehydration failed");
        })?;

        let (state, persist) = match loaded {
            Some(mut state) => {
                let advanced = engine::settle(&mut state, now);
                tracing::info!(
                    %tournament_id,
                    level = state.current_level,
                    remaining = state.time_remaining_seconds,
                    advanced,
                    "timer rehydrated"
                );
                (state, advanced > 0)
            }
            None => {
                let (schedule_id, levels) = self
                    .persistence
                    .configured_levels(tournament_id)
                    .await
                    .inspect_err(|e| {
                        tracing::warn!(%tournament_id, error = %e, "schedule lookup failed");
                    })?;
                tracing::info!(%tournament_id, %schedule_id, "timer created");
                (TimerState::new(tournament_id, schedule_id, levels, now), true)
            }
        };

        let (handle, inserted) = self.store.insert_if_absent(state).await;
        if inserted && persist {
            let state = handle.lock().await;
            self.persistence.save(&state);
        }
        Ok(handle)
    }

    /// Returns an up-to-date snapshot of the tournament's clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::PersistenceError`] if the clock cannot be
    /// loaded, or [`ClockError::InvalidSchedule`] if it is malformed; such a
    /// state is never sent to clients.
    pub async fn sync(&self, tournament_id: TournamentId) -> Result<TimerState, ClockError> {
        self.sync_at(tournament_id, Utc::now()).await
    }

    /// [`TimerService::sync`] as of `now`.
    ///
    /// # Errors
    ///
    /// Same as [`TimerService::sync`].
    pub async fn sync_at(
        &self,
        tournament_id: TournamentId,
        now: DateTime<Utc>,
    ) -> Result<TimerState, ClockError> {
        let handle = self.get_or_create(tournament_id).await?;
        let mut state = handle.lock().await;

        let outcome = engine::tick(&mut state, now);
        if outcome.advanced {
            self.persistence.save(&state);
            self.publish(&state);
        }

        state.check_well_formed()?;
        Ok(state.clone())
    }

    /// Applies a director's control operation and fans the result out.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ScheduleLocked`] for a schedule change while
    /// running, [`ClockError::InvalidRequest`] for an empty schedule id, or
    /// [`ClockError::PersistenceError`] if the clock or the tournament's
    /// custom levels cannot be read. A rejected operation leaves the clock
    /// unchanged.
    pub async fn control(
        &self,
        tournament_id: TournamentId,
        action: TimerAction,
    ) -> Result<TimerState, ClockError> {
        self.control_at(tournament_id, action, Utc::now()).await
    }

    /// [`TimerService::control`] as of `now`.
    ///
    /// # Errors
    ///
    /// Same as [`TimerService::control`].
    pub async fn control_at(
        &self,
        tournament_id: TournamentId,
        action: TimerAction,
        now: DateTime<Utc>,
    ) -> Result<TimerState, ClockError> {
        let command = self.resolve(tournament_id, action).await?;
        let name = command.name();

        let handle = self.get_or_create(tournament_id).await?;
        let mut state = handle.lock().await;

        if let Err(e) = engine::apply(&mut state, command, now, self.set_time_ceiling) {
            tracing::info!(%tournament_id, command = name, error = %e, "timer command rejected");
            return Err(e);
        }

        tracing::info!(
            %tournament_id,
            command = name,
            level = state.current_level,
            remaining = state.time_remaining_seconds,
            status = ?state.status(),
            "timer command applied"
        );

        self.persistence.save(&state);
        self.publish(&state);
        Ok(state.clone())
    }

    /// Ticks every running clock once and publishes the results.
    pub async fn tick_all(&self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();

        for (tournament_id, handle) in self.store.handles().await {
            let mut state = handle.lock().await;
            if !state.is_running {
                continue;
            }

            let outcome = engine::tick(&mut state, now);
            report.ticked += 1;

            if outcome.advanced {
                report.advanced += 1;
                tracing::info!(
                    %tournament_id,
                    level = state.current_level,
                    paused_after_break = outcome.paused_after_break,
                    "blind level advanced"
                );
                self.persistence.save(&state);
            }

            if !self.publish(&state) {
                report.suppressed += 1;
            }
        }

        report
    }

    /// Writes every loaded clock and waits for the results.
    pub async fn persist_all(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for (tournament_id, handle) in self.store.handles().await {
            let snapshot = handle.lock().await.clone();
            match self.persistence.save_now(&snapshot).await {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(%tournament_id, error = %e, "timer sweep write failed");
                }
            }
        }

        report
    }

    /// Publishes `state` to its room unless it is malformed.
    ///
    /// Returns whether the update went out.
    fn publish(&self, state: &TimerState) -> bool {
        if let Err(e) = state.check_well_formed() {
            tracing::warn!(
                tournament_id = %state.tournament_id,
                error = %e,
                "malformed timer state withheld from broadcast"
            );
            return false;
        }
        let _ = self.event_bus.publish(TimerEvent::update(state.clone()));
        true
    }

    async fn resolve(
        &self,
        tournament_id: TournamentId,
        action: TimerAction,
    ) -> Result<TimerCommand, ClockError> {
        let command = match action {
            TimerAction::Start => TimerCommand::Start,
            TimerAction::Pause => TimerCommand::Pause,
            TimerAction::Resume => TimerCommand::Resume,
            TimerAction::Reset => TimerCommand::Reset,
            TimerAction::NextLevel => TimerCommand::NextLevel,
            TimerAction::PrevLevel => TimerCommand::PrevLevel,
            TimerAction::SetTime { seconds } => TimerCommand::SetTime { seconds },
            TimerAction::SetSchedule { schedule_id } => {
                let schedule_id = schedule_id.trim();
                if schedule_id.is_empty() {
                    return Err(ClockError::InvalidRequest(
                        "scheduleId must not be empty".to_string(),
                    ));
                }
                let (schedule_id, levels) =
                    self.persistence.levels_for(tournament_id, schedule_id).await?;
                TimerCommand::SetSchedule {
                    schedule_id,
                    levels,
                }
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::TimerStatus;
    use crate::domain::engine::MAX_SET_TIME_SECONDS;
    use crate::persistence::models::TimerRow;
    use crate::persistence::{InMemoryTimerRepository, TimerRepository};
    use chrono::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    fn make_service() -> (TimerService, Arc<InMemoryTimerRepository>) {
        let repo = Arc::new(InMemoryTimerRepository::new());
        let gateway = PersistenceGateway::new(Arc::clone(&repo) as Arc<dyn TimerRepository>);
        let service = TimerService::new(
            Arc::new(TimerStore::new()),
            gateway,
            EventBus::new(1000),
            MAX_SET_TIME_SECONDS,
        );
        (service, repo)
    }

    async fn current(service: &TimerService, id: TournamentId) -> TimerState {
        let Ok(handle) = service.get_or_create(id).await else {
            panic!("clock {id} should load");
        };
        handle.lock().await.clone()
    }

    async fn wait_for_row(repo: &InMemoryTimerRepository, id: TournamentId) -> Option<TimerRow> {
        for _ in 0..100 {
            let row = repo.row(id).await;
            if row.as_ref().is_some_and(|r| r.timer_current_level.is_some()) {
                return row;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        None
    }

    #[tokio::test]
    async fn first_access_creates_and_persists_a_stopped_clock() {
        let (service, repo) = make_service();
        repo.put_row(TimerRow::unstarted(TournamentId::new(1), Some("turbo")))
            .await;

        let Ok(handle) = service.get_or_create(TournamentId::new(1)).await else {
            panic!("clock should be created");
        };
        {
            let state = handle.lock().await;
            assert_eq!(state.schedule_id, "turbo");
            assert_eq!(state.current_level, 1);
            assert_eq!(state.time_remaining_seconds, 600);
            assert_eq!(state.status(), TimerStatus::Stopped);
        }

        let Some(row) = wait_for_row(&repo, TournamentId::new(1)).await else {
            panic!("initial state should be persisted");
        };
        assert_eq!(row.timer_current_level, Some(1));
        assert_eq!(row.timer_time_remaining, Some(600));
    }

    #[tokio::test]
    async fn repeated_access_returns_the_same_clock() {
        let (service, _) = make_service();
        let (Ok(a), Ok(b)) = (
            service.get_or_create(TournamentId::new(1)).await,
            service.get_or_create(TournamentId::new(1)).await,
        ) else {
            panic!("clock should be created");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn first_access_rehydrates_a_running_clock() {
        let (service, repo) = make_service();
        let mut row = TimerRow::unstarted(TournamentId::new(2), Some("standard"));
        row.timer_current_level = Some(2);
        row.timer_time_remaining = Some(100);
        row.timer_is_running = true;
        row.timer_last_update = Some(Utc::now() - Duration::seconds(45));
        repo.put_row(row).await;

        let state = current(&service, TournamentId::new(2)).await;
        assert_eq!(state.current_level, 2);
        assert!((54..=55).contains(&state.time_remaining_seconds));
        assert_eq!(state.status(), TimerStatus::Running);
    }

    #[tokio::test]
    async fn unreadable_storage_is_retried_on_next_access() {
        let (service, repo) = make_service();
        let id = TournamentId::new(3);
        repo.put_row(TimerRow::unstarted(id, Some("deep-stack"))).await;
        repo.make_unavailable(id).await;

        let result = service.sync(id).await;
        assert!(matches!(result, Err(ClockError::PersistenceError(_))));
        assert!(service.store().get(id).await.is_none());

        repo.make_available(id).await;
        let Ok(state) = service.sync(id).await else {
            panic!("sync should succeed once storage is back");
        };
        assert_eq!(state.schedule_id, "deep-stack");
    }

    #[tokio::test]
    async fn failed_load_never_overwrites_the_durable_clock() {
        let (service, repo) = make_service();
        let id = TournamentId::new(1);
        let persisted_at = Utc::now();
        let mut row = TimerRow::unstarted(id, Some("turbo"));
        row.timer_current_level = Some(9);
        row.timer_time_remaining = Some(300);
        row.timer_is_running = true;
        row.timer_last_update = Some(persisted_at);
        repo.put_row(row).await;

        repo.make_unavailable(id).await;
        assert!(service.sync(id).await.is_err());
        assert!(service.control(id, TimerAction::Reset).await.is_err());
        repo.make_available(id).await;

        let report = service.persist_all().await;
        assert_eq!(report, SweepReport { saved: 0, failed: 0 });

        let Some(durable) = repo.row(id).await else {
            panic!("row should still exist");
        };
        assert_eq!(durable.timer_current_level, Some(9));
        assert_eq!(durable.timer_time_remaining, Some(300));
        assert!(durable.timer_is_running);
        assert_eq!(durable.blind_schedule_id.as_deref(), Some("turbo"));

        let state = current(&service, id).await;
        assert_eq!(state.current_level, 9);
        assert_eq!(state.schedule_id, "turbo");
        assert_eq!(state.status(), TimerStatus::Running);
    }

    #[tokio::test]
    async fn control_broadcasts_update_to_the_room() {
        let (service, _) = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service.control(TournamentId::new(1), TimerAction::Start).await;
        let Ok(state) = result else {
            panic!("start should succeed");
        };
        assert_eq!(state.status(), TimerStatus::Running);

        let Ok(event) = rx.recv().await else {
            panic!("expected update");
        };
        assert_eq!(event.tournament_id, TournamentId::new(1));
        assert!(event.state.is_running);
    }

    #[tokio::test]
    async fn control_persists_each_transition() {
        let (service, repo) = make_service();
        let id = TournamentId::new(5);
        repo.put_row(TimerRow::unstarted(id, None)).await;
        let _ = service.control(id, TimerAction::NextLevel).await;
        let _ = service.control(id, TimerAction::NextLevel).await;

        let mut level = None;
        for _ in 0..100 {
            level = repo.row(id).await.and_then(|r| r.timer_current_level);
            if level == Some(3) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(level, Some(3));
    }

    #[tokio::test]
    async fn schedule_change_while_running_is_rejected_quietly() {
        let (service, _) = make_service();
        let id = TournamentId::new(1);
        let _ = service.control(id, TimerAction::Start).await;
        let _ = service.control(id, TimerAction::NextLevel).await;
        let before = current(&service, id).await;

        let mut rx = service.event_bus().subscribe();
        let result = service
            .control(
                id,
                TimerAction::SetSchedule {
                    schedule_id: "turbo".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(ClockError::ScheduleLocked)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        let after = current(&service, id).await;
        assert_eq!(after.current_level, before.current_level);
        assert_eq!(after.blind_levels, before.blind_levels);
        assert_eq!(after.schedule_id, before.schedule_id);
    }

    #[tokio::test]
    async fn schedule_change_while_paused_resets() {
        let (service, _) = make_service();
        let id = TournamentId::new(1);
        let _ = service.control(id, TimerAction::Start).await;
        let _ = service.control(id, TimerAction::NextLevel).await;
        let _ = service.control(id, TimerAction::Pause).await;

        let Ok(state) = service
            .control(
                id,
                TimerAction::SetSchedule {
                    schedule_id: "deep-stack".into(),
                },
            )
            .await
        else {
            panic!("schedule change should succeed while paused");
        };
        assert_eq!(state.schedule_id, "deep-stack");
        assert_eq!(state.current_level, 1);
        assert_eq!(state.time_remaining_seconds, 1800);
        assert_eq!(state.status(), TimerStatus::Stopped);
    }

    #[tokio::test]
    async fn custom_schedule_comes_from_the_tournament_row() {
        let (service, repo) = make_service();
        let mut row = TimerRow::unstarted(TournamentId::new(9), Some("standard"));
        row.custom_blind_levels = Some(serde_json::json!([
            {"level": 1, "durationMinutes": 3, "smallBlind": 1, "bigBlind": 2},
            {"level": 2, "durationMinutes": 3, "smallBlind": 2, "bigBlind": 4}
        ]));
        repo.put_row(row).await;

        let Ok(state) = service
            .control(
                TournamentId::new(9),
                TimerAction::SetSchedule {
                    schedule_id: "custom".into(),
                },
            )
            .await
        else {
            panic!("custom schedule should apply");
        };
        assert_eq!(state.schedule_id, "custom");
        assert_eq!(state.level_count(), 2);
        assert_eq!(state.time_remaining_seconds, 180);
    }

    #[tokio::test]
    async fn empty_schedule_id_is_invalid() {
        let (service, _) = make_service();
        let result = service
            .control(
                TournamentId::new(1),
                TimerAction::SetSchedule {
                    schedule_id: "  ".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(ClockError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn set_time_is_clamped_by_the_service_ceiling() {
        let (service, _) = make_service();
        let Ok(state) = service
            .control(TournamentId::new(1), TimerAction::SetTime { seconds: 99_999 })
            .await
        else {
            panic!("set time should succeed");
        };
        assert_eq!(state.time_remaining_seconds, MAX_SET_TIME_SECONDS);
    }

    #[tokio::test]
    async fn sync_returns_a_ticked_snapshot() {
        let (service, _) = make_service();
        let id = TournamentId::new(1);
        let _ = service.control(id, TimerAction::Start).await;
        {
            let Ok(handle) = service.get_or_create(id).await else {
                panic!("clock should load");
            };
            let mut state = handle.lock().await;
            state.last_update -= Duration::seconds(30);
        }

        let Ok(state) = service.sync(id).await else {
            panic!("sync should succeed");
        };
        assert!(state.time_remaining_seconds <= 1200 - 30);
    }

    #[tokio::test]
    async fn tick_all_only_touches_running_clocks() {
        let (service, _) = make_service();
        let _ = service.control(TournamentId::new(1), TimerAction::Start).await;
        let _ = service.get_or_create(TournamentId::new(2)).await;

        let mut rx = service.event_bus().subscribe();
        let report = service.tick_all(Utc::now() + Duration::seconds(5)).await;
        assert_eq!(report.ticked, 1);
        assert_eq!(report.suppressed, 0);

        let Ok(event) = rx.recv().await else {
            panic!("expected update");
        };
        assert_eq!(event.tournament_id, TournamentId::new(1));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn tick_all_withholds_malformed_states() {
        let (service, _) = make_service();
        let mut broken = TimerState::new(TournamentId::new(4), "custom".into(), Vec::new(), Utc::now());
        broken.is_running = true;
        service.store().seed(broken).await;

        let mut rx = service.event_bus().subscribe();
        let report = service.tick_all(Utc::now()).await;
        assert_eq!(report.ticked, 1);
        assert_eq!(report.suppressed, 1);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        assert!(service.sync(TournamentId::new(4)).await.is_err());
    }

    #[tokio::test]
    async fn tick_all_advances_and_pauses_after_break() {
        let (service, _) = make_service();
        let id = TournamentId::new(1);
        // Standard level 5 is a break.
        for _ in 0..4 {
            let _ = service.control(id, TimerAction::NextLevel).await;
        }
        let _ = service.control(id, TimerAction::SetTime { seconds: 2 }).await;
        let _ = service.control(id, TimerAction::Start).await;

        let report = service.tick_all(Utc::now() + Duration::seconds(3)).await;
        assert_eq!(report.advanced, 1);

        let state = current(&service, id).await;
        assert_eq!(state.current_level, 6);
        assert_eq!(state.status(), TimerStatus::Paused);
    }

    #[tokio::test]
    async fn persist_all_writes_every_clock() {
        let (service, repo) = make_service();
        repo.put_row(TimerRow::unstarted(TournamentId::new(1), None)).await;
        let _ = service.get_or_create(TournamentId::new(1)).await;
        let _ = service.get_or_create(TournamentId::new(2)).await;
        repo.make_unavailable(TournamentId::new(2)).await;

        let report = service.persist_all().await;
        assert_eq!(report, SweepReport { saved: 1, failed: 1 });
        assert!(
            repo.row(TournamentId::new(1))
                .await
                .is_some_and(|row| row.timer_current_level.is_some())
        );
    }

    #[derive(Debug, Clone)]
    enum Step {
        Control(TimerAction),
        Tick,
    }

    /// A script of operations, each at a fixed offset in seconds.
    fn script(seed: i64) -> Vec<(i64, Step)> {
        let mut steps = vec![(0, Step::Control(TimerAction::Start))];
        for i in 1..=40 {
            let at = i * 7 + seed;
            let step = match (i + seed) % 6 {
                0 => Step::Control(TimerAction::NextLevel),
                1 => Step::Control(TimerAction::Pause),
                2 => Step::Control(TimerAction::Resume),
                3 => Step::Control(TimerAction::SetTime { seconds: 20 + seed }),
                _ => Step::Tick,
            };
            steps.push((at, step));
        }
        steps
    }

    async fn run_script(
        service: &TimerService,
        id: TournamentId,
        t0: DateTime<Utc>,
        steps: Vec<(i64, Step)>,
        interleave: bool,
    ) {
        for (offset, step) in steps {
            let now = t0 + Duration::seconds(offset);
            let result = match step {
                Step::Control(action) => service.control_at(id, action, now).await,
                Step::Tick => service.sync_at(id, now).await,
            };
            if let Err(e) = result {
                panic!("step at {offset}s on {id} failed: {e}");
            }
            if interleave {
                tokio::task::yield_now().await;
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tournaments_match_their_own_replay() {
        let (service, _) = make_service();
        let service = Arc::new(service);
        let a = TournamentId::new(1);
        let b = TournamentId::new(2);
        let t0 = Utc::now() + Duration::seconds(5);

        let tasks: Vec<_> = [(a, 0), (b, 3)]
            .into_iter()
            .map(|(id, seed)| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    run_script(&service, id, t0, script(seed), true).await;
                })
            })
            .collect();
        for task in tasks {
            if let Err(e) = task.await {
                panic!("script task failed: {e}");
            }
        }

        for (id, seed) in [(a, 0), (b, 3)] {
            let (replay, _) = make_service();
            run_script(&replay, id, t0, script(seed), false).await;

            let expected = current(&replay, id).await;
            let actual = current(&service, id).await;
            assert_eq!(actual.current_level, expected.current_level, "level of {id}");
            assert_eq!(
                actual.time_remaining_seconds, expected.time_remaining_seconds,
                "remaining of {id}"
            );
            assert_eq!(actual.last_update, expected.last_update, "last update of {id}");
            assert_eq!(actual.status(), expected.status(), "status of {id}");
        }
    }
}
