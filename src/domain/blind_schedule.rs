//! Blind levels and level sequences.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ClockError;

/// One numbered stage of the tournament clock.
///
/// Break levels carry zero blinds and act as a hand-off point: when the
/// clock leaves a break it pauses until a director resumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlindLevel {
    /// 1-based position in the schedule.
    pub level: u32,
    /// Length of the level in minutes.
    pub duration_minutes: u32,
    /// Small blind in chips.
    pub small_blind: u64,
    /// Big blind in chips.
    pub big_blind: u64,
    /// Ante in chips, if the level has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ante: Option<u64>,
    /// Whether the level is a break.
    #[serde(default)]
    pub is_break: bool,
}

impl BlindLevel {
    /// A playing level.
    #[must_use]
    pub const fn play(
        level: u32,
        duration_minutes: u32,
        small_blind: u64,
        big_blind: u64,
        ante: Option<u64>,
    ) -> Self {
        Self {
            level,
            duration_minutes,
            small_blind,
            big_blind,
            ante,
            is_break: false,
        }
    }

    /// A break level.
    #[must_use]
    pub const fn pause(level: u32, duration_minutes: u32) -> Self {
        Self {
            level,
            duration_minutes,
            small_blind: 0,
            big_blind: 0,
            ante: None,
            is_break: true,
        }
    }

    /// Full length of the level in seconds.
    #[must_use]
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }
}

/// A named, ordered sequence of blind levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlindSchedule {
    /// Catalog identifier (e.g. `"standard"`), or `"custom"`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Levels in play order.
    pub levels: Vec<BlindLevel>,
}

/// Checks that a level sequence is usable by the clock.
///
/// The sequence must be non-empty, numbered contiguously from 1, every
/// level must last at least a minute, and breaks must not carry blinds.
///
/// # Errors
///
/// Returns [`ClockError::InvalidSchedule`] describing the first violation.
pub fn validate_levels(levels: &[BlindLevel]) -> Result<(), ClockError> {
    if levels.is_empty() {
        return Err(ClockError::InvalidSchedule(
            "schedule has no levels".to_string(),
        ));
    }

    for (expected, lvl) in (1u32..).zip(levels) {
        if lvl.level != expected {
            return Err(ClockError::InvalidSchedule(format!(
                "expected level {expected}, got {}",
                lvl.level
            )));
        }
        if lvl.duration_minutes == 0 {
            return Err(ClockError::InvalidSchedule(format!(
                "level {expected} has zero duration"
            )));
        }
        if lvl.is_break && (lvl.small_blind != 0 || lvl.big_blind != 0) {
            return Err(ClockError::InvalidSchedule(format!(
                "break level {expected} carries blinds"
            )));
        }
    }

    Ok(())
}
