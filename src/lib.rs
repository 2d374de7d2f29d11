//! # blind-clock
//!
//! Authoritative blind-level clock for live poker tournaments.
//!
//! The server owns one clock per tournament, advances it every second,
//! enforces the break and schedule rules, and pushes every change to the
//! clients in the tournament's room over WebSocket. Clock state is
//! persisted on every mutation and on a periodic sweep, and clocks that
//! were running when the process stopped are restored before the server
//! accepts connections.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket rooms, REST)
//!     │
//!     ├── WS Handler (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TimerService, tick driver, sweep, recovery (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── TimerStore + engine (domain/)
//!     │
//!     └── PersistenceGateway → PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod ws;
