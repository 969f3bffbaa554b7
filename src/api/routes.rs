//! API route definitions.
//!
//! The dashboard polls `/alerts` and `/status` and issues the monitoring
//! and clear commands; everything returns JSON. Pipeline failures never
//! surface here -- only store access can error, and that maps to a 500
//! with a JSON error body.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::error;

use super::state::AppState;
use crate::source::mock::mock_threat_post;
use crate::storage::Alert;

/// Cap on `/alerts` responses; the dashboard shows at most a page of these.
const LIST_LIMIT: usize = 100;
/// Cap and window for `/alerts/recent`.
const RECENT_LIMIT: usize = 50;
const RECENT_WINDOW_HOURS: i64 = 24;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/alerts", get(list_alerts).delete(clear_alerts))
        .route("/alerts/recent", get(recent_alerts))
        .route("/status", get(status))
        .route("/monitoring/start", post(start_monitoring))
        .route("/monitoring/stop", post(stop_monitoring))
        .route("/test/generate-mock-alert", get(generate_mock_alert))
}

/// Error wrapper turning internal failures into a JSON 500.
struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "api handler failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<Alert>>, ApiError> {
    let alerts = state.store.list(LIST_LIMIT)?;
    Ok(Json(alerts))
}

async fn recent_alerts(State(state): State<AppState>) -> Result<Json<Vec<Alert>>, ApiError> {
    let alerts = state.store.list_recent(RECENT_WINDOW_HOURS, RECENT_LIMIT)?;
    Ok(Json(alerts))
}

async fn clear_alerts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let removed = state.controller.clear()?;
    Ok(Json(json!({ "message": format!("Cleared {} alerts", removed) })))
}

async fn status(State(state): State<AppState>) -> Json<crate::monitor::MonitoringState> {
    Json(state.controller.status())
}

async fn start_monitoring(State(state): State<AppState>) -> Json<Value> {
    let message = if state.controller.start() {
        "Monitoring started successfully"
    } else {
        "Monitoring is already running"
    };
    Json(json!({ "message": message }))
}

async fn stop_monitoring(State(state): State<AppState>) -> Json<Value> {
    let message = if state.controller.stop() {
        "Monitoring stopped successfully"
    } else {
        "Monitoring is not running"
    };
    Json(json!({ "message": message }))
}

/// Synthesize one threatening post, run it through the real pipeline, and
/// persist the alert regardless of the threshold. Test/demo hook for the
/// dashboard.
async fn generate_mock_alert(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let post = mock_threat_post();
    let verdict = state.pipeline.analyze(&post).await;
    let alert = Alert::from_verdict(&post, &verdict);
    state.controller.record_alert(&alert)?;
    Ok(Json(json!({ "message": "Mock alert generated", "alert": alert })))
}
