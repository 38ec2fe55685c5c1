use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::db;
use crate::state::AppState;

/// GET /api/health
/// Returns service status, version, database reachability and the active
/// reminder settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = if db::ping(&state.db).await {
        "connected"
    } else {
        "disconnected"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "gym-api",
        "database": database,
        "today": state.today(),
        "reminders": state.engine.settings(),
    }))
}
