// Reminder engine: expiry and absence views computed over a snapshot of
// customers and check-ins. Pure and synchronous; I/O lives in `source` and
// `handlers`.

pub mod absence;
pub mod error;
pub mod expiry;
pub mod handlers;
pub mod settings;
pub mod snapshot;
pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::checkin::CheckinRow;
use crate::models::customer::CustomerRow;

pub use absence::AbsenceReminder;
pub use error::ReminderError;
pub use expiry::ExpiryReminder;
pub use settings::ReminderSettings;
pub use snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderReport {
    pub today: NaiveDate,
    pub expiry: Vec<ExpiryReminder>,
    pub absence: Vec<AbsenceReminder>,
}

/// Both reminder views under one set of settings. Same snapshot and same
/// `today` always give the same ordered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderEngine {
    settings: ReminderSettings,
}

impl ReminderEngine {
    pub fn new(settings: ReminderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReminderSettings {
        &self.settings
    }

    pub fn expiry(&self, customers: &[CustomerRow], today: NaiveDate) -> Vec<ExpiryReminder> {
        expiry::compute_expiry_reminders(customers, today, self.settings.expiry_window_days())
    }

    pub fn absence(
        &self,
        customers: &[CustomerRow],
        checkins: &[CheckinRow],
        today: NaiveDate,
    ) -> Vec<AbsenceReminder> {
        absence::compute_absence_reminders(
            customers,
            checkins,
            today,
            &self.settings.calendar(),
            self.settings.absence_threshold_days(),
        )
    }

    pub fn evaluate(&self, snapshot: &Snapshot, today: NaiveDate) -> ReminderReport {
        ReminderReport {
            today,
            expiry: self.expiry(&snapshot.customers, today),
            absence: self.absence(&snapshot.customers, &snapshot.checkins, today),
        }
    }
}
