//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::TimerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Timer service for all clock logic.
    pub timer_service: Arc<TimerService>,
    /// Event bus for WebSocket room fan-out.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the state around a service, sharing its event bus.
    #[must_use]
    pub fn new(timer_service: Arc<TimerService>) -> Self {
        let event_bus = timer_service.event_bus().clone();
        Self {
            timer_service,
            event_bus,
        }
    }
}
