use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::days_between;
use crate::models::customer::CustomerRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryReminder {
    pub customer: CustomerRow,
    /// `end_date - today`: positive = days left, negative = days overdue.
    pub days_remaining: i64,
    pub is_expired: bool,
}

/// Memberships that ended or end within `window_days` of `today`.
///
/// Abandoned members are skipped. There is no lower bound on overdue days.
/// Order: expired first, then by `days_remaining` ascending; ties keep the
/// input order.
pub fn compute_expiry_reminders(
    customers: &[CustomerRow],
    today: NaiveDate,
    window_days: i64,
) -> Vec<ExpiryReminder> {
    let mut reminders: Vec<ExpiryReminder> = customers
        .iter()
        .filter(|c| !c.renewal_intent.is_abandoned())
        .filter_map(|c| {
            let days_remaining = days_between(c.end_date, today);
            (days_remaining <= window_days).then(|| ExpiryReminder {
                customer: c.clone(),
                days_remaining,
                is_expired: days_remaining < 0,
            })
        })
        .collect();

    // sort_by is stable
    reminders.sort_by(|a, b| {
        b.is_expired
            .cmp(&a.is_expired)
            .then(a.days_remaining.cmp(&b.days_remaining))
    });
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::RenewalIntent;
    use crate::reminders::fixtures::{customer, date};

    fn names(reminders: &[ExpiryReminder]) -> Vec<&str> {
        reminders.iter().map(|r| r.customer.name.as_str()).collect()
    }

    #[test]
    fn test_expiring_today_is_day_zero_not_expired() {
        let today = date(2024, 6, 10);
        let out = compute_expiry_reminders(&[customer("A").ends(today)], today, 7);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].days_remaining, 0);
        assert!(!out[0].is_expired);
    }

    #[test]
    fn test_abandoned_never_listed() {
        let today = date(2024, 6, 10);
        let customers = vec![
            customer("gone-past")
                .ends(date(2024, 5, 1))
                .intent(RenewalIntent::Abandoned),
            customer("gone-today")
                .ends(today)
                .intent(RenewalIntent::Abandoned),
            customer("gone-soon")
                .ends(date(2024, 6, 12))
                .intent(RenewalIntent::Abandoned),
        ];
        assert!(compute_expiry_reminders(&customers, today, 7).is_empty());
    }

    #[test]
    fn test_window_is_inclusive() {
        let today = date(2024, 6, 10);
        let customers = vec![
            customer("in").ends(date(2024, 6, 17)),
            customer("out").ends(date(2024, 6, 18)),
        ];
        let out = compute_expiry_reminders(&customers, today, 7);
        assert_eq!(names(&out), vec!["in"]);
        assert_eq!(out[0].days_remaining, 7);
    }

    #[test]
    fn test_long_overdue_still_listed() {
        let today = date(2024, 6, 10);
        let out = compute_expiry_reminders(&[customer("old").ends(date(2023, 1, 1))], today, 7);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_expired);
        assert_eq!(out[0].days_remaining, -526);
    }

    #[test]
    fn test_ordering_expired_first_then_ascending() {
        let today = date(2024, 6, 10);
        let customers = vec![
            customer("soon").ends(date(2024, 6, 15)),
            customer("overdue-2").ends(date(2024, 6, 8)),
            customer("today").ends(today),
            customer("overdue-30").ends(date(2024, 5, 11)),
            customer("tomorrow").ends(date(2024, 6, 11)),
        ];
        let out = compute_expiry_reminders(&customers, today, 7);
        assert_eq!(
            names(&out),
            vec!["overdue-30", "overdue-2", "today", "tomorrow", "soon"]
        );

        let first_active = out.iter().position(|r| !r.is_expired).unwrap();
        assert!(out[..first_active].iter().all(|r| r.is_expired));
        assert!(out[first_active..].iter().all(|r| !r.is_expired));
        assert!(out
            .windows(2)
            .all(|w| w[0].days_remaining <= w[1].days_remaining));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let today = date(2024, 6, 10);
        let end = date(2024, 6, 12);
        let customers = vec![
            customer("first").ends(end),
            customer("second").ends(end),
            customer("third").ends(end),
        ];
        let out = compute_expiry_reminders(&customers, today, 7);
        assert_eq!(names(&out), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zero_window_keeps_only_today_and_expired() {
        let today = date(2024, 6, 10);
        let customers = vec![
            customer("tomorrow").ends(date(2024, 6, 11)),
            customer("today").ends(today),
            customer("yesterday").ends(date(2024, 6, 9)),
        ];
        let out = compute_expiry_reminders(&customers, today, 0);
        assert_eq!(names(&out), vec!["yesterday", "today"]);
    }

    #[test]
    fn test_scenario_medium_expired_and_abandoned_skipped() {
        let today = date(2024, 6, 10);
        let customers = vec![
            customer("A")
                .ends(date(2024, 6, 8))
                .intent(RenewalIntent::Medium),
            customer("B")
                .ends(date(2024, 6, 17))
                .intent(RenewalIntent::Abandoned),
        ];
        let out = compute_expiry_reminders(&customers, today, 7);
        assert_eq!(names(&out), vec!["A"]);
        assert_eq!(out[0].days_remaining, -2);
        assert!(out[0].is_expired);
    }
}
