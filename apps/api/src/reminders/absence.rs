use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::{days_between, CivilCalendar};
use crate::models::checkin::CheckinRow;
use crate::models::customer::CustomerRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceReminder {
    pub customer: CustomerRow,
    /// Days since the last check-in, or since registration if there is none.
    pub days_absent: i64,
    pub last_checkin_date: Option<NaiveDate>,
    pub never_checked_in: bool,
}

/// Latest check-in date per customer, in one pass over the snapshot.
fn latest_checkins(checkins: &[CheckinRow]) -> HashMap<Uuid, NaiveDate> {
    let mut latest: HashMap<Uuid, NaiveDate> = HashMap::new();
    for checkin in checkins {
        latest
            .entry(checkin.customer_id)
            .and_modify(|d| {
                if checkin.checkin_date > *d {
                    *d = checkin.checkin_date;
                }
            })
            .or_insert(checkin.checkin_date);
    }
    latest
}

/// Members who have not checked in for more than `threshold_days`.
///
/// Members who never checked in are always listed, counted from their
/// registration date in `calendar` (0 when they registered today).
/// Order: `days_absent` descending, never-checked-in members ranked alongside
/// the rest; ties keep the input order. Check-ins for unknown customers are
/// ignored.
pub fn compute_absence_reminders(
    customers: &[CustomerRow],
    checkins: &[CheckinRow],
    today: NaiveDate,
    calendar: &CivilCalendar,
    threshold_days: i64,
) -> Vec<AbsenceReminder> {
    let latest = latest_checkins(checkins);

    let mut reminders: Vec<AbsenceReminder> = customers
        .iter()
        .filter_map(|customer| match latest.get(&customer.id) {
            Some(&last) => {
                let days_absent = days_between(today, last);
                (days_absent > threshold_days).then(|| AbsenceReminder {
                    customer: customer.clone(),
                    days_absent,
                    last_checkin_date: Some(last),
                    never_checked_in: false,
                })
            }
            None => {
                let registered = calendar.date_of(customer.created_at);
                Some(AbsenceReminder {
                    customer: customer.clone(),
                    days_absent: days_between(today, registered),
                    last_checkin_date: None,
                    never_checked_in: true,
                })
            }
        })
        .collect();

    reminders.sort_by(|a, b| b.days_absent.cmp(&a.days_absent));
    reminders
}
