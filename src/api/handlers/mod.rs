//! REST endpoint handlers organized by resource.

pub mod schedule;
pub mod system;
pub mod timer;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(schedule::routes())
        .merge(timer::routes())
}
