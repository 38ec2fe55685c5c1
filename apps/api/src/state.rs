use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::clock::Clock;
use crate::reminders::source::SnapshotSource;
use crate::reminders::ReminderEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Wall clock. `SystemClock` in production, `FixedClock` in tests.
    pub clock: Arc<dyn Clock>,
    /// Snapshot loader for the reminder endpoints.
    pub snapshots: Arc<dyn SnapshotSource>,
    pub engine: ReminderEngine,
}

impl AppState {
    /// Today in the configured civil calendar.
    pub fn today(&self) -> NaiveDate {
        self.engine.settings().calendar().today(self.clock.as_ref())
    }
}
