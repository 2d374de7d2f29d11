//! Service layer: clock orchestration, recovery, and background drivers.
//!
//! [`TimerService`] coordinates clock operations, hands writes to the
//! persistence gateway, and emits events through the
//! [`super::domain::EventBus`].

pub mod drivers;
pub mod recovery;
pub mod timer_service;

pub use drivers::{spawn_persistence_sweep, spawn_tick_driver};
pub use recovery::{RecoveryReport, recover_timers};
pub use timer_service::{SweepReport, TickReport, TimerAction, TimerService};
