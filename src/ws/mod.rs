//! WebSocket layer: connection handling, event routing, room membership.
//!
//! The WebSocket endpoint at `/ws` carries the clock protocol: clients
//! join tournament rooms, directors send control events, and every member
//! of a room receives `timer:update` after each change.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
