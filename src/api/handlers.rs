//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, response::Json};
use tracing::info;

use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use crate::{error::TimerError, state::AppState};

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, TimerError> {
    let timer = state.start()?;
    info!("Start endpoint called - {} remaining", timer.display);
    Ok(Json(ApiResponse::ok("Timer started".to_string(), timer)))
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, TimerError> {
    let timer = state.pause()?;
    info!("Pause endpoint called - {} remaining", timer.display);
    Ok(Json(ApiResponse::ok("Timer paused".to_string(), timer)))
}

/// Handle POST /timer/reset - Restore the full duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, TimerError> {
    let timer = state.reset()?;
    info!("Reset endpoint called");
    Ok(Json(ApiResponse::ok("Timer reset".to_string(), timer)))
}

/// Handle GET /status - Return the timer and the workout behind it
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.snapshot(),
        workout: state.workout(),
        warnings: state.warnings(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
