// Builders for reminder tests.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::checkin::CheckinRow;
use crate::models::customer::{CustomerRow, RenewalIntent};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Member registered 2024-01-01 (UTC+8) with a far-off end date.
pub fn customer(name: &str) -> CustomerRow {
    let created_at = instant("2024-01-01T02:00:00Z");
    CustomerRow {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: format!("138{:08}", name.len()),
        gender: "female".to_string(),
        project_type: "self-service".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2099, 12, 31),
        notes: String::new(),
        renewal_intent: RenewalIntent::Medium,
        comments: String::new(),
        created_at,
        updated_at: created_at,
    }
}

pub fn checkin(customer: &CustomerRow, on: NaiveDate) -> CheckinRow {
    CheckinRow {
        id: Uuid::new_v4(),
        customer_id: customer.id,
        checkin_date: on,
        checkin_time: None,
    }
}

impl CustomerRow {
    pub fn ends(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn intent(mut self, renewal_intent: RenewalIntent) -> Self {
        self.renewal_intent = renewal_intent;
        self
    }

    pub fn registered(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }
}
