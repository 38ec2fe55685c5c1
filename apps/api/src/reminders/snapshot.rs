use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::clock::CivilCalendar;
use crate::models::checkin::CheckinRow;
use crate::models::customer::{CustomerRow, RenewalIntent};
use crate::reminders::error::ReminderError;

/// Customers and check-ins as read from storage, in storage order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub customers: Vec<CustomerRow>,
    pub checkins: Vec<CheckinRow>,
}

/// Snapshot as posted by an external caller. Dates arrive as strings and are
/// validated here; nothing is defaulted or coerced.
#[derive(Debug, Deserialize)]
pub struct SnapshotPayload {
    pub customers: Vec<CustomerRecord>,
    #[serde(default)]
    pub checkins: Vec<CheckinRecord>,
    /// Overrides "today" (`YYYY-MM-DD`).
    pub today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub project_type: String,
    /// Not read by the engine. Defaults to the civil registration date.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub renewal_intent: RenewalIntent,
    #[serde(default)]
    pub comments: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub checkin_date: Option<String>,
    pub checkin_time: Option<String>,
}

impl SnapshotPayload {
    /// Validates every record. The first bad record fails the whole payload.
    pub fn into_snapshot(
        self,
        calendar: &CivilCalendar,
    ) -> Result<(Snapshot, Option<NaiveDate>), ReminderError> {
        let today = self
            .today
            .as_deref()
            .map(|s| {
                parse_plain_date(s).ok_or_else(|| {
                    ReminderError::Validation(format!("today: malformed date '{s}'"))
                })
            })
            .transpose()?;

        let customers = self
            .customers
            .into_iter()
            .map(|c| c.into_row(calendar))
            .collect::<Result<Vec<_>, _>>()?;
        let checkins = self
            .checkins
            .into_iter()
            .map(|c| c.into_row(calendar))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            Snapshot {
                customers,
                checkins,
            },
            today,
        ))
    }
}

impl CustomerRecord {
    fn into_row(self, calendar: &CivilCalendar) -> Result<CustomerRow, ReminderError> {
        let record = format!("customer {}", self.id);
        let end_date = required_date(&record, "end_date", self.end_date.as_deref(), calendar)?;
        let created_at =
            required_instant(&record, "created_at", self.created_at.as_deref(), calendar)?;
        let start_date = match self.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => required_date(&record, "start_date", Some(raw), calendar)?,
            None => calendar.date_of(created_at),
        };

        Ok(CustomerRow {
            id: self.id,
            name: self.name,
            phone: self.phone,
            gender: self.gender,
            project_type: self.project_type,
            start_date,
            end_date,
            notes: self.notes,
            renewal_intent: self.renewal_intent,
            comments: self.comments,
            created_at,
            updated_at: created_at,
        })
    }
}

impl CheckinRecord {
    fn into_row(self, calendar: &CivilCalendar) -> Result<CheckinRow, ReminderError> {
        let record = format!("checkin {}", self.id);
        let checkin_date =
            required_date(&record, "checkin_date", self.checkin_date.as_deref(), calendar)?;
        let checkin_time = self
            .checkin_time
            .as_deref()
            .map(|s| {
                parse_time(s).ok_or_else(|| {
                    ReminderError::Validation(format!("{record}: malformed checkin_time '{s}'"))
                })
            })
            .transpose()?;

        Ok(CheckinRow {
            id: self.id,
            customer_id: self.customer_id,
            checkin_date,
            checkin_time,
        })
    }
}

fn parse_plain_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (taken as its civil date).
fn parse_date(s: &str, calendar: &CivilCalendar) -> Option<NaiveDate> {
    parse_plain_date(s).or_else(|| {
        DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| calendar.date_of(dt.with_timezone(&Utc)))
    })
}

/// Accepts an RFC 3339 timestamp or `YYYY-MM-DD` (civil midnight).
fn parse_instant(s: &str, calendar: &CivilCalendar) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| parse_plain_date(s).and_then(|d| calendar.start_of_day(d)))
}

fn required_date(
    record: &str,
    field: &str,
    value: Option<&str>,
    calendar: &CivilCalendar,
) -> Result<NaiveDate, ReminderError> {
    let raw = value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ReminderError::Validation(format!("{record}: missing {field}")))?;
    parse_date(raw, calendar)
        .ok_or_else(|| ReminderError::Validation(format!("{record}: malformed {field} '{raw}'")))
}

fn required_instant(
    record: &str,
    field: &str,
    value: Option<&str>,
    calendar: &CivilCalendar,
) -> Result<DateTime<Utc>, ReminderError> {
    let raw = value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ReminderError::Validation(format!("{record}: missing {field}")))?;
    parse_instant(raw, calendar)
        .ok_or_else(|| ReminderError::Validation(format!("{record}: malformed {field} '{raw}'")))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use serde_json::json;

    use super::*;

    fn utc8() -> CivilCalendar {
        CivilCalendar::new(FixedOffset::east_opt(8 * 3600).unwrap())
    }

    fn payload(value: serde_json::Value) -> SnapshotPayload {
        serde_json::from_value(value).unwrap()
    }

    const ID: &str = "6f1c7c1e-3b8a-4a59-9d0e-1a2b3c4d5e6f";

    fn member(extra: serde_json::Value) -> serde_json::Value {
        let mut base = json!({
            "id": ID,
            "name": "Lin",
            "start_date": "2024-05-01",
            "end_date": "2024-06-08",
            "created_at": "2024-05-01T02:00:00Z"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base
    }

    #[test]
    fn test_valid_payload_parses() {
        let p = payload(json!({
            "customers": [member(json!({"renewal_intent": "abandoned"}))],
            "checkins": [{
                "id": "0b7f7c1e-3b8a-4a59-9d0e-1a2b3c4d5e6f",
                "customer_id": ID,
                "checkin_date": "2024-06-05",
                "checkin_time": "18:30"
            }],
            "today": "2024-06-10"
        }));
        let (snapshot, today) = p.into_snapshot(&utc8()).unwrap();
        assert_eq!(today, NaiveDate::from_ymd_opt(2024, 6, 10));
        assert_eq!(snapshot.customers.len(), 1);
        assert_eq!(snapshot.customers[0].renewal_intent, RenewalIntent::Abandoned);
        assert_eq!(
            snapshot.checkins[0].checkin_time,
            NaiveTime::from_hms_opt(18, 30, 0)
        );
    }

    #[test]
    fn test_defaults_medium_intent() {
        let (snapshot, today) = payload(json!({ "customers": [member(json!({}))] }))
            .into_snapshot(&utc8())
            .unwrap();
        assert_eq!(today, None);
        assert_eq!(snapshot.customers[0].renewal_intent, RenewalIntent::Medium);
        assert!(snapshot.checkins.is_empty());
    }

    #[test]
    fn test_timestamp_end_date_takes_civil_date() {
        // 2024-06-07T16:00Z is midnight 2024-06-08 at UTC+8
        let (snapshot, _) = payload(json!({
            "customers": [member(json!({"end_date": "2024-06-07T16:00:00.000Z"}))]
        }))
        .into_snapshot(&utc8())
        .unwrap();
        assert_eq!(
            snapshot.customers[0].end_date,
            NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
        );
    }

    #[test]
    fn test_date_only_created_at_is_civil_midnight() {
        let cal = utc8();
        let (snapshot, _) = payload(json!({
            "customers": [member(json!({"created_at": "2024-06-10"}))]
        }))
        .into_snapshot(&cal)
        .unwrap();
        assert_eq!(
            cal.date_of(snapshot.customers[0].created_at),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }

    #[test]
    fn test_missing_end_date_rejected() {
        let err = payload(json!({ "customers": [member(json!({"end_date": null}))] }))
            .into_snapshot(&utc8())
            .unwrap_err();
        assert_eq!(
            err,
            ReminderError::Validation(format!("customer {ID}: missing end_date"))
        );
    }

    #[test]
    fn test_malformed_end_date_rejected() {
        let err = payload(json!({ "customers": [member(json!({"end_date": "Invalid Date"}))] }))
            .into_snapshot(&utc8())
            .unwrap_err();
        assert!(matches!(
            err,
            ReminderError::Validation(msg) if msg.contains("malformed end_date")
        ));
    }

    #[test]
    fn test_missing_start_date_defaults_to_registration_day() {
        // 2024-05-01T17:00Z is already 2024-05-02 at UTC+8
        let (snapshot, _) = payload(json!({
            "customers": [member(json!({
                "start_date": null,
                "created_at": "2024-05-01T17:00:00Z"
            }))]
        }))
        .into_snapshot(&utc8())
        .unwrap();
        assert_eq!(
            snapshot.customers[0].start_date,
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
    }

    #[test]
    fn test_malformed_start_date_still_rejected() {
        let err = payload(json!({ "customers": [member(json!({"start_date": "soon"}))] }))
            .into_snapshot(&utc8())
            .unwrap_err();
        assert!(matches!(
            err,
            ReminderError::Validation(msg) if msg.contains("malformed start_date")
        ));
    }

    #[test]
    fn test_blank_checkin_date_rejected() {
        let err = payload(json!({
            "customers": [member(json!({}))],
            "checkins": [{
                "id": "0b7f7c1e-3b8a-4a59-9d0e-1a2b3c4d5e6f",
                "customer_id": ID,
                "checkin_date": "  "
            }]
        }))
        .into_snapshot(&utc8())
        .unwrap_err();
        assert!(matches!(
            err,
            ReminderError::Validation(msg) if msg.contains("missing checkin_date")
        ));
    }

    #[test]
    fn test_malformed_today_rejected() {
        let err = payload(json!({ "customers": [], "today": "10/06/2024" }))
            .into_snapshot(&utc8())
            .unwrap_err();
        assert!(matches!(err, ReminderError::Validation(_)));
    }
}
