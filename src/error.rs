//! Error types for the timer core and the backend adapter

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::state::{SessionState, TimerAction};

/// Errors raised by the countdown engine and the session owner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("invalid workout duration: {0} seconds")]
    InvalidDuration(u64),

    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: TimerAction,
        state: SessionState,
    },

    #[error("no workout session is open")]
    NoSession,
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = match self {
            TimerError::InvalidDuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TimerError::InvalidTransition { .. } => StatusCode::CONFLICT,
            TimerError::NoSession => StatusCode::NOT_FOUND,
        };

        (status, Json(json!({ "status": "error", "message": self.to_string() }))).into_response()
    }
}

/// Errors returned by calls to the workout backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend rejected the token; log in again")]
    Unauthorized,

    #[error("workout {0} not found")]
    NotFound(String),

    #[error("backend reported the request as unsuccessful")]
    Rejected,

    #[error("backend responded with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A completed workout whose completion could not be persisted remotely.
///
/// The local session stays `Completed`; callers surface this as a warning.
#[derive(Debug, Error)]
#[error("completion of workout {workout_id} was not synced: {source}")]
pub struct SyncFailure {
    pub workout_id: String,
    #[source]
    pub source: BackendError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_maps_to_conflict() {
        let err = TimerError::InvalidTransition {
            action: TimerAction::Pause,
            state: SessionState::Idle,
        };
        assert_eq!(err.to_string(), "cannot pause while session is idle");
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_session_maps_to_not_found() {
        assert_eq!(TimerError::NoSession.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn sync_failure_names_the_workout() {
        let failure = SyncFailure {
            workout_id: "w-1".to_string(),
            source: BackendError::Rejected,
        };
        assert_eq!(
            failure.to_string(),
            "completion of workout w-1 was not synced: backend reported the request as unsuccessful"
        );
    }
}
