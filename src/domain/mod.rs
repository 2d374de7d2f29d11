//! Domain layer: blind schedules, the clock state machine, and the
//! in-memory clock store.
//!
//! Nothing in this module performs I/O. The engine is a set of pure
//! functions over [`TimerState`]; the store and event bus are the only
//! shared mutable pieces and are injected where needed.

pub mod blind_schedule;
pub mod engine;
pub mod event_bus;
pub mod schedule_catalog;
pub mod timer_event;
pub mod timer_state;
pub mod timer_store;
pub mod tournament_id;

pub use blind_schedule::{BlindLevel, BlindSchedule};
pub use engine::{TickOutcome, TimerCommand};
pub use event_bus::EventBus;
pub use timer_event::TimerEvent;
pub use timer_state::{TimerState, TimerStatus};
pub use timer_store::{TimerHandle, TimerStore};
pub use tournament_id::TournamentId;
