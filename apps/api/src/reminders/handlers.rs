use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::reminders::snapshot::SnapshotPayload;
use crate::reminders::{AbsenceReminder, ExpiryReminder, ReminderReport};
use crate::state::AppState;

/// GET /api/reminders
pub async fn handle_reminders(
    State(state): State<AppState>,
) -> Result<Json<ReminderReport>, AppError> {
    let snapshot = state.snapshots.load().await?;
    let today = state.today();
    let report = state.engine.evaluate(&snapshot, today);
    info!(
        "Reminders for {today}: {} expiring, {} absent",
        report.expiry.len(),
        report.absence.len()
    );
    Ok(Json(report))
}

/// GET /api/reminders/expiry
pub async fn handle_expiry_reminders(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExpiryReminder>>, AppError> {
    let snapshot = state.snapshots.load().await?;
    let today = state.today();
    let reminders = state.engine.expiry(&snapshot.customers, today);
    info!("Expiry reminders for {today}: {}", reminders.len());
    Ok(Json(reminders))
}

/// GET /api/reminders/absence
pub async fn handle_absence_reminders(
    State(state): State<AppState>,
) -> Result<Json<Vec<AbsenceReminder>>, AppError> {
    let snapshot = state.snapshots.load().await?;
    let today = state.today();
    let reminders = state
        .engine
        .absence(&snapshot.customers, &snapshot.checkins, today);
    info!("Absence reminders for {today}: {}", reminders.len());
    Ok(Json(reminders))
}

/// POST /api/reminders/evaluate
/// Runs the engine over a caller-supplied snapshot instead of stored data.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(payload): Json<SnapshotPayload>,
) -> Result<Json<ReminderReport>, AppError> {
    let calendar = state.engine.settings().calendar();
    let (snapshot, today) = payload.into_snapshot(&calendar)?;
    let today = today.unwrap_or_else(|| state.today());
    Ok(Json(state.engine.evaluate(&snapshot, today)))
}
