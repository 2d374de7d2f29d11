//! Blind schedule catalog DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BlindSchedule;

/// Catalog entry for `GET /schedules`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    /// Schedule identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of levels, breaks included.
    pub level_count: usize,
    /// Number of break levels.
    pub break_count: usize,
    /// Sum of all level durations.
    pub total_minutes: u64,
}

impl From<&BlindSchedule> for ScheduleSummary {
    fn from(schedule: &BlindSchedule) -> Self {
        Self {
            id: schedule.id.clone(),
            name: schedule.name.clone(),
            level_count: schedule.levels.len(),
            break_count: schedule.levels.iter().filter(|l| l.is_break).count(),
            total_minutes: schedule
                .levels
                .iter()
                .map(|l| u64::from(l.duration_minutes))
                .sum(),
        }
    }
}

/// Response body for `GET /schedules`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleListResponse {
    /// Catalog entries in catalog order.
    pub data: Vec<ScheduleSummary>,
}
