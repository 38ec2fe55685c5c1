use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::clock::CivilCalendar;
use crate::reminders::error::ReminderError;

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
pub const DEFAULT_ABSENCE_THRESHOLD_DAYS: i64 = 3;
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;

const MIN_OFFSET_HOURS: i32 = -12;
const MAX_OFFSET_HOURS: i32 = 14;

/// Validated reminder parameters.
///
/// - `absence_threshold_days`: members with a last check-in strictly more than
///   this many days ago are reported absent.
/// - `expiry_window_days`: memberships ending within this many days are
///   reported; already expired ones are always reported.
/// - `utc_offset_hours`: civil calendar used for "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderSettings {
    utc_offset_hours: i32,
    absence_threshold_days: i64,
    expiry_window_days: i64,
    #[serde(skip)]
    calendar: CivilCalendar,
}

impl ReminderSettings {
    pub fn new(
        utc_offset_hours: i32,
        absence_threshold_days: i64,
        expiry_window_days: i64,
    ) -> Result<Self, ReminderError> {
        if !(MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS).contains(&utc_offset_hours) {
            return Err(ReminderError::Configuration(format!(
                "UTC offset must be within {MIN_OFFSET_HOURS}..={MAX_OFFSET_HOURS}h, \
                 got {utc_offset_hours}"
            )));
        }
        if absence_threshold_days < 0 {
            return Err(ReminderError::Configuration(format!(
                "absence threshold must not be negative, got {absence_threshold_days}"
            )));
        }
        if expiry_window_days < 0 {
            return Err(ReminderError::Configuration(format!(
                "expiry window must not be negative, got {expiry_window_days}"
            )));
        }
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
            ReminderError::Configuration(format!("unrepresentable UTC offset {utc_offset_hours}h"))
        })?;

        Ok(Self {
            utc_offset_hours,
            absence_threshold_days,
            expiry_window_days,
            calendar: CivilCalendar::new(offset),
        })
    }

    pub fn utc_offset_hours(&self) -> i32 {
        self.utc_offset_hours
    }

    pub fn absence_threshold_days(&self) -> i64 {
        self.absence_threshold_days
    }

    pub fn expiry_window_days(&self) -> i64 {
        self.expiry_window_days
    }

    pub fn calendar(&self) -> CivilCalendar {
        self.calendar
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            absence_threshold_days: DEFAULT_ABSENCE_THRESHOLD_DAYS,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            calendar: CivilCalendar::new(
                FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix()),
            ),
        }
    }
}
