//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` sits at the
//! root. The clock itself is driven over the WebSocket; REST is read-only.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "blind-clock", description = "Blind-level clock for live poker tournaments"),
    paths(
        handlers::system::health_handler,
        handlers::schedule::list_schedules,
        handlers::schedule::get_schedule,
        handlers::timer::get_timer,
    ),
    components(schemas(
        handlers::system::HealthResponse,
        dto::ScheduleListResponse,
        dto::ScheduleSummary,
        dto::TimerView,
        crate::domain::BlindLevel,
        crate::domain::BlindSchedule,
        crate::domain::TimerStatus,
        crate::domain::TournamentId,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
