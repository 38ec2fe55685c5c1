use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How likely a member is to renew. `Abandoned` members get no expiry reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "renewal_intent", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RenewalIntent {
    High,
    #[default]
    Medium,
    Low,
    Abandoned,
}

impl RenewalIntent {
    pub fn is_abandoned(self) -> bool {
        self == RenewalIntent::Abandoned
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub project_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
    pub renewal_intent: RenewalIntent,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One membership period. Renewals append rows here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerProjectRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub project_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
