//! Clock arithmetic and control operations.
//!
//! Everything here is a pure function of a [`TimerState`] and the current
//! instant: no I/O, no locking, no clock reads. Callers hold the
//! per-tournament lock and pass `now` in, which keeps the level-advance
//! rules testable with synthetic time.
//!
//! Level-advance rules:
//!
//! - Only a running, unpaused clock consumes time.
//! - Elapsed time is counted in whole seconds; the sub-second remainder
//!   stays in `last_update` for the next tick.
//! - Reaching zero below the last level moves to the next level at its
//!   full duration. Elapsed time beyond the boundary is dropped.
//! - Leaving a break pauses the clock on the new level. A director must
//!   resume play after a break.
//! - At the last level the clock clamps at zero.

use chrono::{DateTime, Duration, Utc};

use super::blind_schedule::BlindLevel;
use super::timer_state::{TimerState, TimerStatus};
use crate::error::ClockError;

/// Default ceiling for manually set remaining time (99:59).
pub const MAX_SET_TIME_SECONDS: u32 = 5999;

/// A control operation requested by a director.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start (or restart after a pause) the countdown.
    Start,
    /// Hold the countdown at its current value.
    Pause,
    /// Continue a paused countdown.
    Resume,
    /// Return to level 1, stopped.
    Reset,
    /// Jump to the next level at full duration.
    NextLevel,
    /// Jump to the previous level at full duration.
    PrevLevel,
    /// Overwrite the remaining time of the current level.
    SetTime {
        /// Requested remaining time; clamped into range.
        seconds: i64,
    },
    /// Swap the level sequence. Rejected while running.
    SetSchedule {
        /// Identifier of the new schedule.
        schedule_id: String,
        /// Levels of the new schedule.
        levels: Vec<BlindLevel>,
    },
}

impl TimerCommand {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::NextLevel => "next_level",
            Self::PrevLevel => "prev_level",
            Self::SetTime { .. } => "set_time",
            Self::SetSchedule { .. } => "set_schedule",
        }
    }
}

/// What a single [`tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whole seconds consumed from the clock.
    pub elapsed_seconds: u32,
    /// Whether the clock moved to the next level.
    pub advanced: bool,
    /// Whether the clock paused because it left a break.
    pub paused_after_break: bool,
}

/// Whole seconds between two instants; zero when `to` is not after `from`.
fn whole_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let secs = (to - from).num_seconds().max(0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Brings the remaining time up to `now` and advances the level when it
/// runs out.
pub fn tick(state: &mut TimerState, now: DateTime<Utc>) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    if state.status() != TimerStatus::Running || now < state.last_update {
        state.last_update = now;
        return outcome;
    }

    let elapsed = whole_seconds(state.last_update, now);
    outcome.elapsed_seconds = elapsed;
    state.time_remaining_seconds = state.time_remaining_seconds.saturating_sub(elapsed);
    state.last_update += Duration::seconds(i64::from(elapsed));

    if state.time_remaining_seconds == 0 && state.current_level < state.level_count() {
        let leaving_break = state.current().is_some_and(|l| l.is_break);
        state.current_level += 1;
        state.time_remaining_seconds = state.current().map_or(0, BlindLevel::duration_seconds);
        state.last_update = now;
        outcome.advanced = true;

        if leaving_break {
            state.is_paused = true;
            outcome.paused_after_break = true;
        }
    }

    outcome
}

/// Ticks until the clock no longer sits at zero below the last level.
///
/// Used after rehydration, where the elapsed gap may have drained the
/// level entirely. Returns the number of levels advanced.
pub fn settle(state: &mut TimerState, now: DateTime<Utc>) -> u32 {
    let mut advanced = 0;
    for _ in 0..state.level_count() {
        let ready = state.status() == TimerStatus::Running
            && state.time_remaining_seconds == 0
            && state.current_level < state.level_count();
        if !ready {
            break;
        }
        if tick(state, now).advanced {
            advanced += 1;
        }
    }
    advanced
}

/// Stopped|Paused → Running.
pub fn start(state: &mut TimerState, now: DateTime<Utc>) {
    if state.status() == TimerStatus::Running {
        tick(state, now);
        return;
    }
    state.is_running = true;
    state.is_paused = false;
    state.last_update = now;
}

/// Running → Paused, freezing the elapsed-adjusted remaining time.
pub fn pause(state: &mut TimerState, now: DateTime<Utc>) {
    if state.status() != TimerStatus::Running {
        return;
    }
    tick(state, now);
    state.is_paused = true;
    state.last_update = now;
}

/// Paused → Running without touching the remaining time.
pub fn resume(state: &mut TimerState, now: DateTime<Utc>) {
    if state.status() != TimerStatus::Paused {
        return;
    }
    state.is_paused = false;
    state.last_update = now;
}

/// Any state → Stopped at level 1, full duration.
pub fn reset(state: &mut TimerState, now: DateTime<Utc>) {
    state.current_level = 1;
    state.time_remaining_seconds = state.current().map_or(0, BlindLevel::duration_seconds);
    state.is_running = false;
    state.is_paused = false;
    state.last_update = now;
}

/// Moves `delta` levels, clamped to the schedule, at full duration.
pub fn set_level(state: &mut TimerState, delta: i64, now: DateTime<Utc>) {
    let last = i64::from(state.level_count().max(1));
    let target = i64::from(state.current_level)
        .saturating_add(delta)
        .clamp(1, last);
    state.current_level = u32::try_from(target).unwrap_or(1);
    state.time_remaining_seconds = state.current().map_or(0, BlindLevel::duration_seconds);
    state.last_update = now;
}

/// Overwrites the remaining time, clamped into `0..=ceiling`.
pub fn set_time(state: &mut TimerState, seconds: i64, ceiling: u32, now: DateTime<Utc>) {
    let clamped = seconds.clamp(0, i64::from(ceiling));
    state.time_remaining_seconds = u32::try_from(clamped).unwrap_or(0);
    state.last_update = now;
}

/// Replaces the level sequence and resets the clock.
///
/// # Errors
///
/// Returns [`ClockError::ScheduleLocked`] while the clock is running; the
/// state is left untouched.
pub fn set_schedule(
    state: &mut TimerState,
    schedule_id: String,
    levels: Vec<BlindLevel>,
    now: DateTime<Utc>,
) -> Result<(), ClockError> {
    if state.status() == TimerStatus::Running {
        return Err(ClockError::ScheduleLocked);
    }
    state.blind_levels = levels;
    state.schedule_id = schedule_id;
    reset(state, now);
    Ok(())
}

/// Applies a director command.
///
/// # Errors
///
/// Returns [`ClockError::ScheduleLocked`] for a schedule change on a
/// running clock. No other command can fail.
pub fn apply(
    state: &mut TimerState,
    command: TimerCommand,
    now: DateTime<Utc>,
    set_time_ceiling: u32,
) -> Result<(), ClockError> {
    match command {
        TimerCommand::Start => start(state, now),
        TimerCommand::Pause => pause(state, now),
        TimerCommand::Resume => resume(state, now),
        TimerCommand::Reset => reset(state, now),
        TimerCommand::NextLevel => set_level(state, 1, now),
        TimerCommand::PrevLevel => set_level(state, -1, now),
        TimerCommand::SetTime { seconds } => set_time(state, seconds, set_time_ceiling, now),
        TimerCommand::SetSchedule {
            schedule_id,
            levels,
        } => set_schedule(state, schedule_id, levels, now)?,
    }
    Ok(())
}
