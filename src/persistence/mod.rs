//! Persistence layer: durable timer state and recovery reads.
//!
//! The [`repository::TimerRepository`] trait abstracts storage of the
//! clock columns of the tournament record. [`postgres`] implements it with
//! `sqlx::PgPool`, [`memory`] with a `HashMap`. [`gateway`] adds the
//! fire-and-forget write policy and elapsed-time rehydration on top.

pub mod gateway;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use gateway::PersistenceGateway;
pub use memory::InMemoryTimerRepository;
pub use postgres::PostgresTimerRepository;
pub use repository::TimerRepository;
