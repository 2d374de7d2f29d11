//! WebSocket message types: client events and server events.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::domain::{TimerState, TournamentId};
use crate::service::TimerAction;

/// A tournament reference as clients send it.
///
/// Accepts a bare number (`7`), a numeric string (`"7"`), or an object
/// carrying `tournamentId` in either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct RoomKey(pub TournamentId);

impl TryFrom<serde_json::Value> for RoomKey {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(|id| Self(TournamentId::new(id)))
                .ok_or_else(|| format!("tournament id {n} is not an integer")),
            serde_json::Value::String(s) => s
                .trim()
                .parse::<TournamentId>()
                .map(Self)
                .map_err(|_| format!("tournament id {s:?} is not an integer")),
            serde_json::Value::Object(mut map) => match map.remove("tournamentId") {
                Some(inner) => Self::try_from(inner),
                None => Err("missing tournamentId".to_string()),
            },
            other => Err(format!("unexpected tournament reference: {other}")),
        }
    }
}

/// Payload naming only a tournament.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentPayload {
    /// Target tournament.
    pub tournament_id: RoomKey,
}

/// Payload of `timer:setTime`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTimePayload {
    /// Target tournament.
    pub tournament_id: RoomKey,
    /// New remaining time; clamped by the server.
    pub time_in_seconds: i64,
}

/// Payload of `timer:setSchedule`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSchedulePayload {
    /// Target tournament.
    pub tournament_id: RoomKey,
    /// Catalog identifier or `"custom"`.
    pub schedule_id: String,
}

/// Events a client can send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join a tournament's room and receive `timer:sync`.
    #[serde(rename = "joinRoom")]
    JoinRoom(RoomKey),
    /// Leave a tournament's room.
    #[serde(rename = "leaveRoom")]
    LeaveRoom(RoomKey),
    /// Ask for a fresh `timer:sync`.
    #[serde(rename = "timer:requestSync")]
    RequestSync(TournamentPayload),
    /// Start the clock.
    #[serde(rename = "timer:start")]
    Start(TournamentPayload),
    /// Pause the clock.
    #[serde(rename = "timer:pause")]
    Pause(TournamentPayload),
    /// Resume the clock.
    #[serde(rename = "timer:resume")]
    Resume(TournamentPayload),
    /// Reset to level 1.
    #[serde(rename = "timer:reset")]
    Reset(TournamentPayload),
    /// Jump to the next level.
    #[serde(rename = "timer:nextLevel")]
    NextLevel(TournamentPayload),
    /// Jump to the previous level.
    #[serde(rename = "timer:prevLevel")]
    PrevLevel(TournamentPayload),
    /// Overwrite the remaining time.
    #[serde(rename = "timer:setTime")]
    SetTime(SetTimePayload),
    /// Switch the blind schedule.
    #[serde(rename = "timer:setSchedule")]
    SetSchedule(SetSchedulePayload),
}

impl ClientEvent {
    /// The control operation this event requests, if it is one.
    #[must_use]
    pub fn into_action(self) -> Option<(TournamentId, TimerAction)> {
        let pair = match self {
            Self::JoinRoom(_) | Self::LeaveRoom(_) | Self::RequestSync(_) => return None,
            Self::Start(p) => (p.tournament_id.0, TimerAction::Start),
            Self::Pause(p) => (p.tournament_id.0, TimerAction::Pause),
            Self::Resume(p) => (p.tournament_id.0, TimerAction::Resume),
            Self::Reset(p) => (p.tournament_id.0, TimerAction::Reset),
            Self::NextLevel(p) => (p.tournament_id.0, TimerAction::NextLevel),
            Self::PrevLevel(p) => (p.tournament_id.0, TimerAction::PrevLevel),
            Self::SetTime(p) => (
                p.tournament_id.0,
                TimerAction::SetTime {
                    seconds: p.time_in_seconds,
                },
            ),
            Self::SetSchedule(p) => (
                p.tournament_id.0,
                TimerAction::SetSchedule {
                    schedule_id: p.schedule_id,
                },
            ),
        };
        Some(pair)
    }
}

/// Payload of `timer:error`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Human-readable reason.
    pub message: String,
}

/// Events the server sends.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent<'a> {
    /// Full state in answer to a join or sync request.
    #[serde(rename = "timer:sync")]
    Sync(&'a TimerState),
    /// Full state after any change, sent to the whole room.
    #[serde(rename = "timer:update")]
    Update(&'a TimerState),
    /// A request from this client failed.
    #[serde(rename = "timer:error")]
    Error(ErrorPayload),
}

impl ServerEvent<'_> {
    /// Builds a `timer:error` event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }

    /// Serializes the event into a text frame body.
    #[must_use]
    pub fn to_frame(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize ws event");
                None
            }
        }
    }
}
