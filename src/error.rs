//! Clock error types with HTTP status code mapping.
//!
//! [`ClockError`] is the central error type. On the WebSocket path a
//! rejected control operation reaches the requesting client as a
//! `timer:error` event; on the REST path each variant maps to a status
//! code and a structured JSON body. Persistence failures on the timer path
//! are only logged and never surface to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "cannot change the blind schedule while the timer is running"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ClockError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category    | HTTP Status               |
/// |-----------|-------------|---------------------------|
/// | 1000–1999 | Validation  | 400 Bad Request           |
/// | 2000–2999 | State       | 409 Conflict              |
/// | 3000–3999 | Server      | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A level sequence is not usable by the clock.
    #[error("invalid blind schedule: {0}")]
    InvalidSchedule(String),

    /// The schedule cannot be swapped while the clock is counting down.
    #[error("cannot change the blind schedule while the timer is running")]
    ScheduleLocked,

    /// Durable storage failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),
}

impl ClockError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidSchedule(_) => 1002,
            Self::ScheduleLocked => 2001,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidSchedule(_) => StatusCode::BAD_REQUEST,
            Self::ScheduleLocked => StatusCode::CONFLICT,
            Self::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ClockError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for ClockError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
