//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use crate::{
    clock,
    error::PomodoroError,
    state::{AppState, Snapshot},
};
use super::responses::{ApiResponse, ClockResponse, HealthResponse, StatusResponse};

fn timer_response(
    action: &str,
    result: Result<Snapshot, PomodoroError>,
    message: impl FnOnce(&Snapshot) -> String,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(snapshot) => {
            info!("{} endpoint called - {} {}", action, snapshot.phase_label, snapshot.remaining_display);
            Ok(Json(ApiResponse::from_snapshot(message(&snapshot), snapshot)))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response("start", state.start(), |s| {
        format!("{} countdown running from {}", s.phase_label, s.remaining_display)
    })
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response("pause", state.pause(), |s| {
        format!("{} countdown paused at {}", s.phase_label, s.remaining_display)
    })
}

/// Handle POST /reset - Return to an idle work phase
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response("reset", state.reset(), |_| "Timer reset".to_string())
}

/// Handle POST /theme/toggle - Switch between light and dark
pub async fn toggle_theme_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, Response> {
    match state.toggle_theme() {
        Ok(snapshot) => {
            info!("Theme toggle endpoint called - theme is now {:?}", snapshot.theme);
            let message = format!("Switched to {:?} theme", snapshot.theme).to_lowercase();
            Ok(Json(ApiResponse::from_snapshot(message, snapshot)))
        }
        Err(e @ PomodoroError::ThemeLocked) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::rejected(e.to_string(), state.snapshot())),
        )
            .into_response()),
        Err(e) => {
            error!("Failed to toggle theme: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// Handle POST /clock/tap - Announce the current time
pub async fn clock_tap_handler(State(state): State<Arc<AppState>>) -> Result<Json<ClockResponse>, StatusCode> {
    match state.tap_clock() {
        Ok(notification) => Ok(Json(ClockResponse {
            clock: clock::now_display(),
            notification,
        })),
        Err(e) => {
            error!("Failed to handle clock tap: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current snapshot and server info
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.snapshot(),
        clock: clock::now_display(),
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
