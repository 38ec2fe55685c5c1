use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::customers::validation::contains_pattern;
use crate::errors::AppError;
use crate::models::checkin::{CheckinRow, CheckinWithCustomerRow};

/// Records a check-in. Duplicate same-day check-ins are a `Conflict`; an
/// unknown customer is `NotFound`.
pub async fn create_checkin(
    pool: &PgPool,
    customer_id: Uuid,
    checkin_date: NaiveDate,
    checkin_time: Option<NaiveTime>,
) -> Result<CheckinRow, AppError> {
    let checkin: CheckinRow = sqlx::query_as(
        r#"
        INSERT INTO checkins (id, customer_id, checkin_date, checkin_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, customer_id, checkin_date, checkin_time
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(customer_id)
    .bind(checkin_date)
    .bind(checkin_time)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict(format!(
                    "Customer {customer_id} has already checked in on {checkin_date}"
                ));
            }
            if db.is_foreign_key_violation() {
                return AppError::NotFound(format!("Customer {customer_id} not found"));
            }
        }
        AppError::Database(e)
    })?;

    info!("Customer {customer_id} checked in on {checkin_date}");
    Ok(checkin)
}

/// Check-ins on `date` with member details, latest time first. `search`
/// filters by name or phone substring.
pub async fn list_for_date(
    pool: &PgPool,
    date: NaiveDate,
    search: Option<&str>,
) -> Result<Vec<CheckinWithCustomerRow>, AppError> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(contains_pattern);

    let rows: Vec<CheckinWithCustomerRow> = sqlx::query_as(
        r#"
        SELECT ch.id, ch.customer_id, ch.checkin_date, ch.checkin_time, c.name, c.phone
        FROM checkins ch
        JOIN customers c ON c.id = ch.customer_id
        WHERE ch.checkin_date = $1
          AND ($2::text IS NULL OR c.name ILIKE $2 OR c.phone ILIKE $2)
        ORDER BY ch.checkin_time DESC NULLS LAST, ch.created_at DESC
        "#,
    )
    .bind(date)
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every check-in, oldest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<CheckinRow>, AppError> {
    let rows: Vec<CheckinRow> = sqlx::query_as(
        "SELECT id, customer_id, checkin_date, checkin_time FROM checkins \
         ORDER BY checkin_date, created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
