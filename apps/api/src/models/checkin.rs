use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CheckinRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub checkin_date: NaiveDate,
    pub checkin_time: Option<NaiveTime>,
}

/// Check-in joined with the member's contact details, for the daily list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckinWithCustomerRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub checkin_date: NaiveDate,
    pub checkin_time: Option<NaiveTime>,
    pub name: String,
    pub phone: String,
}
