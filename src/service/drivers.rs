//! Background tasks that keep clocks moving and durable.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::TimerService;

/// Spawns the tick driver.
///
/// Every `period` each running clock is ticked and its room receives a
/// `timer:update`. A late tick is skipped rather than bunched: the next
/// tick measures elapsed time from the clock's own timestamp, so nothing
/// is lost.
pub fn spawn_tick_driver(service: Arc<TimerService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(?period, "tick driver started");

        loop {
            interval.tick().await;
            let report = service.tick_all(Utc::now()).await;
            if report.advanced > 0 || report.suppressed > 0 {
                tracing::debug!(
                    ticked = report.ticked,
                    advanced = report.advanced,
                    suppressed = report.suppressed,
                    "tick pass"
                );
            }
        }
    })
}

/// Spawns the persistence sweep.
///
/// Every `period` all loaded clocks are written, healing any
/// fire-and-forget write that failed in between.
pub fn spawn_persistence_sweep(service: Arc<TimerService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(?period, "persistence sweep started");

        loop {
            interval.tick().await;
            let report = service.persist_all().await;
            if report.failed > 0 {
                tracing::warn!(saved = report.saved, failed = report.failed, "persistence sweep");
            } else {
                tracing::debug!(saved = report.saved, "persistence sweep");
            }
        }
    })
}
