//! Static registry of predefined blind schedules.
//!
//! Lookups never fail: an unknown identifier resolves to the standard
//! schedule, since a clock running on the wrong cadence is more useful to
//! a tournament floor than no clock at all.

use super::blind_schedule::{BlindLevel, BlindSchedule, validate_levels};

/// Identifier of the fallback schedule.
pub const STANDARD_SCHEDULE_ID: &str = "standard";

/// Identifier used for a tournament-owned level sequence.
pub const CUSTOM_SCHEDULE_ID: &str = "custom";

#[derive(Debug)]
struct Preset {
    id: &'static str,
    name: &'static str,
    levels: &'static [BlindLevel],
}

const STANDARD_LEVELS: &[BlindLevel] = &[
    BlindLevel::play(1, 20, 25, 50, None),
    BlindLevel::play(2, 20, 50, 100, None),
    BlindLevel::play(3, 20, 75, 150, None),
    BlindLevel::play(4, 20, 100, 200, Some(25)),
    BlindLevel::pause(5, 15),
    BlindLevel::play(6, 20, 150, 300, Some(50)),
    BlindLevel::play(7, 20, 200, 400, Some(50)),
    BlindLevel::play(8, 20, 300, 600, Some(75)),
    BlindLevel::play(9, 20, 400, 800, Some(100)),
    BlindLevel::pause(10, 15),
    BlindLevel::play(11, 20, 500, 1000, Some(100)),
    BlindLevel::play(12, 20, 600, 1200, Some(200)),
    BlindLevel::play(13, 20, 800, 1600, Some(200)),
    BlindLevel::play(14, 20, 1000, 2000, Some(300)),
    BlindLevel::play(15, 20, 1500, 3000, Some(400)),
    BlindLevel::play(16, 20, 2000, 4000, Some(500)),
];

const TURBO_LEVELS: &[BlindLevel] = &[
    BlindLevel::play(1, 10, 25, 50, None),
    BlindLevel::play(2, 10, 50, 100, None),
    BlindLevel::play(3, 10, 100, 200, None),
    BlindLevel::play(4, 10, 150, 300, Some(25)),
    BlindLevel::pause(5, 5),
    BlindLevel::play(6, 10, 200, 400, Some(50)),
    BlindLevel::play(7, 10, 300, 600, Some(75)),
    BlindLevel::play(8, 10, 400, 800, Some(100)),
    BlindLevel::play(9, 10, 600, 1200, Some(200)),
    BlindLevel::pause(10, 5),
    BlindLevel::play(11, 10, 800, 1600, Some(200)),
    BlindLevel::play(12, 10, 1000, 2000, Some(300)),
    BlindLevel::play(13, 10, 1500, 3000, Some(400)),
    BlindLevel::play(14, 10, 2000, 4000, Some(500)),
];

const DEEP_STACK_LEVELS: &[BlindLevel] = &[
    BlindLevel::play(1, 30, 50, 100, None),
    BlindLevel::play(2, 30, 75, 150, None),
    BlindLevel::play(3, 30, 100, 200, None),
    BlindLevel::play(4, 30, 150, 300, None),
    BlindLevel::pause(5, 15),
    BlindLevel::play(6, 30, 200, 400, Some(50)),
    BlindLevel::play(7, 30, 250, 500, Some(50)),
    BlindLevel::play(8, 30, 300, 600, Some(75)),
    BlindLevel::play(9, 30, 400, 800, Some(100)),
    BlindLevel::pause(10, 15),
    BlindLevel::play(11, 30, 500, 1000, Some(100)),
    BlindLevel::play(12, 30, 600, 1200, Some(200)),
    BlindLevel::play(13, 30, 800, 1600, Some(200)),
    BlindLevel::play(14, 30, 1000, 2000, Some(300)),
    BlindLevel::pause(15, 20),
    BlindLevel::play(16, 30, 1500, 3000, Some(400)),
    BlindLevel::play(17, 30, 2000, 4000, Some(500)),
];

const PRESETS: &[Preset] = &[
    Preset {
        id: STANDARD_SCHEDULE_ID,
        name: "Standard (20 min levels)",
        levels: STANDARD_LEVELS,
    },
    Preset {
        id: "turbo",
        name: "Turbo (10 min levels)",
        levels: TURBO_LEVELS,
    },
    Preset {
        id: "deep-stack",
        name: "Deep Stack (30 min levels)",
        levels: DEEP_STACK_LEVELS,
    },
];

impl Preset {
    fn to_schedule(&self) -> BlindSchedule {
        BlindSchedule {
            id: self.id.to_string(),
            name: self.name.to_string(),
            levels: self.levels.to_vec(),
        }
    }
}

fn standard() -> BlindSchedule {
    BlindSchedule {
        id: STANDARD_SCHEDULE_ID.to_string(),
        name: "Standard (20 min levels)".to_string(),
        levels: STANDARD_LEVELS.to_vec(),
    }
}

/// Returns the preset with the given identifier, if it exists.
#[must_use]
pub fn find(schedule_id: &str) -> Option<BlindSchedule> {
    PRESETS
        .iter()
        .find(|p| p.id == schedule_id)
        .map(Preset::to_schedule)
}

/// Returns the preset with the given identifier, or the standard schedule
/// when the identifier is unknown.
#[must_use]
pub fn get_schedule(schedule_id: &str) -> BlindSchedule {
    find(schedule_id).unwrap_or_else(|| {
        tracing::debug!(schedule_id, "unknown blind schedule, using standard");
        standard()
    })
}

/// Returns every preset in catalog order.
#[must_use]
pub fn list() -> Vec<BlindSchedule> {
    PRESETS.iter().map(Preset::to_schedule).collect()
}

/// Picks the level sequence a tournament's clock should run.
///
/// `"custom"` selects the tournament-owned `custom_levels`, which are
/// validated and replaced by the standard schedule when missing or
/// malformed. Any other identifier goes through [`get_schedule`]. Returns
/// the identifier actually in effect together with the levels.
#[must_use]
pub fn resolve_levels(
    schedule_id: Option<&str>,
    custom_levels: Option<Vec<BlindLevel>>,
) -> (String, Vec<BlindLevel>) {
    let schedule_id = schedule_id.unwrap_or(STANDARD_SCHEDULE_ID);

    if schedule_id == CUSTOM_SCHEDULE_ID {
        match custom_levels {
            Some(levels) => match validate_levels(&levels) {
                Ok(()) => return (CUSTOM_SCHEDULE_ID.to_string(), levels),
                Err(e) => tracing::warn!(error = %e, "custom blind levels rejected, using standard"),
            },
            None => tracing::warn!("custom schedule selected without levels, using standard"),
        }
        let fallback = standard();
        return (fallback.id, fallback.levels);
    }

    let schedule = get_schedule(schedule_id);
    (schedule.id, schedule.levels)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_is_valid() {
        for schedule in list() {
            assert!(
                validate_levels(&schedule.levels).is_ok(),
                "preset {} is malformed",
                schedule.id
            );
        }
    }

    #[test]
    fn every_preset_contains_a_break() {
        for schedule in list() {
            assert!(schedule.levels.iter().any(|l| l.is_break), "{}", schedule.id);
        }
    }

    #[test]
    fn known_id_resolves() {
        let turbo = get_schedule("turbo");
        assert_eq!(turbo.id, "turbo");
        assert_eq!(turbo.levels.first().map(|l| l.duration_minutes), Some(10));
    }

    #[test]
    fn unknown_id_falls_back_to_standard() {
        let schedule = get_schedule("no-such-schedule");
        assert_eq!(schedule.id, STANDARD_SCHEDULE_ID);
        assert!(find("no-such-schedule").is_none());
    }

    #[test]
    fn resolve_defaults_to_standard() {
        let (id, levels) = resolve_levels(None, None);
        assert_eq!(id, STANDARD_SCHEDULE_ID);
        assert_eq!(levels.len(), STANDARD_LEVELS.len());
    }

    #[test]
    fn resolve_custom_uses_owned_levels() {
        let custom = vec![
            BlindLevel::play(1, 5, 10, 20, None),
            BlindLevel::play(2, 5, 20, 40, None),
        ];
        let (id, levels) = resolve_levels(Some(CUSTOM_SCHEDULE_ID), Some(custom.clone()));
        assert_eq!(id, CUSTOM_SCHEDULE_ID);
        assert_eq!(levels, custom);
    }

    #[test]
    fn resolve_malformed_custom_falls_back() {
        let broken = vec![BlindLevel::play(2, 5, 10, 20, None)];
        let (id, _) = resolve_levels(Some(CUSTOM_SCHEDULE_ID), Some(broken));
        assert_eq!(id, STANDARD_SCHEDULE_ID);

        let (id, _) = resolve_levels(Some(CUSTOM_SCHEDULE_ID), None);
        assert_eq!(id, STANDARD_SCHEDULE_ID);
    }
}
