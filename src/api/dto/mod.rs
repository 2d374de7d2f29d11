//! Data Transfer Objects for REST response serialization.
//!
//! Field names are camelCase to match the WebSocket payloads.

pub mod schedule_dto;
pub mod timer_dto;

pub use schedule_dto::*;
pub use timer_dto::*;
