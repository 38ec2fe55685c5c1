use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::customers::validation::{contains_pattern, MembershipPeriod, NewCustomer};
use crate::errors::{conflict_on_unique, AppError};
use crate::models::customer::{CustomerProjectRow, CustomerRow, RenewalIntent};

const CUSTOMER_COLUMNS: &str = "id, name, phone, gender, project_type, start_date, end_date, \
     notes, renewal_intent, comments, created_at, updated_at";

const DUPLICATE_PHONE: &str = "A customer with this phone number already exists";

/// All customers, newest registration first.
pub async fn list_customers(pool: &PgPool) -> Result<Vec<CustomerRow>, AppError> {
    let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at DESC, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All customers in insertion order. Reminder tie-breaks depend on this order.
pub async fn list_customers_in_storage_order(
    pool: &PgPool,
) -> Result<Vec<CustomerRow>, AppError> {
    let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Case-insensitive substring match on name or phone, newest first.
pub async fn search_customers(pool: &PgPool, term: &str) -> Result<Vec<CustomerRow>, AppError> {
    let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers \
         WHERE name ILIKE $1 OR phone ILIKE $1 \
         ORDER BY created_at DESC, id"
    ))
    .bind(contains_pattern(term))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts the customer and its first membership period in one transaction.
pub async fn create_customer(pool: &PgPool, new: &NewCustomer) -> Result<CustomerRow, AppError> {
    let mut tx = pool.begin().await?;

    let customer: CustomerRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO customers
            (id, name, phone, gender, project_type, start_date, end_date, notes, renewal_intent)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {CUSTOMER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.phone)
    .bind(&new.gender)
    .bind(&new.project_type)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(&new.notes)
    .bind(new.renewal_intent)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, DUPLICATE_PHONE))?;

    insert_project(
        &mut tx,
        customer.id,
        &MembershipPeriod {
            project_type: new.project_type.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            notes: new.notes.clone(),
        },
    )
    .await?;

    tx.commit().await?;
    info!("Registered customer {}", customer.id);
    Ok(customer)
}

/// Deletes a customer; check-ins and membership periods cascade.
/// Returns `false` if no such customer exists.
pub async fn delete_customer(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        info!("Deleted customer {id} and its check-ins");
    }
    Ok(result.rows_affected() > 0)
}

pub async fn update_renewal_intent(
    pool: &PgPool,
    id: Uuid,
    intent: RenewalIntent,
) -> Result<Option<CustomerRow>, AppError> {
    let row: Option<CustomerRow> = sqlx::query_as(&format!(
        "UPDATE customers SET renewal_intent = $1, updated_at = now() \
         WHERE id = $2 RETURNING {CUSTOMER_COLUMNS}"
    ))
    .bind(intent)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Free-text column the caller may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Notes,
    Comments,
}

impl TextField {
    fn column(self) -> &'static str {
        match self {
            TextField::Notes => "notes",
            TextField::Comments => "comments",
        }
    }
}

pub async fn update_text_field(
    pool: &PgPool,
    id: Uuid,
    field: TextField,
    value: &str,
) -> Result<Option<CustomerRow>, AppError> {
    let row: Option<CustomerRow> = sqlx::query_as(&format!(
        "UPDATE customers SET {} = $1, updated_at = now() \
         WHERE id = $2 RETURNING {CUSTOMER_COLUMNS}",
        field.column()
    ))
    .bind(value.trim())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Appends a membership period and makes it the customer's current one.
pub async fn renew_customer(
    pool: &PgPool,
    id: Uuid,
    period: &MembershipPeriod,
) -> Result<Option<CustomerRow>, AppError> {
    let mut tx = pool.begin().await?;

    let customer: Option<CustomerRow> = sqlx::query_as(&format!(
        r#"
        UPDATE customers
        SET project_type = $1, start_date = $2, end_date = $3, updated_at = now()
        WHERE id = $4
        RETURNING {CUSTOMER_COLUMNS}
        "#
    ))
    .bind(&period.project_type)
    .bind(period.start_date)
    .bind(period.end_date)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(customer) = customer else {
        return Ok(None);
    };

    insert_project(&mut tx, id, period).await?;
    tx.commit().await?;

    info!(
        "Renewed customer {id}: {} until {}",
        period.project_type, period.end_date
    );
    Ok(Some(customer))
}

/// Membership history, oldest first.
pub async fn list_projects(
    pool: &PgPool,
    customer_id: Uuid,
) -> Result<Vec<CustomerProjectRow>, AppError> {
    let rows: Vec<CustomerProjectRow> = sqlx::query_as(
        r#"
        SELECT id, customer_id, project_type, start_date, end_date, notes, created_at
        FROM customer_projects
        WHERE customer_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn customer_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

async fn insert_project(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    customer_id: Uuid,
    period: &MembershipPeriod,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO customer_projects (id, customer_id, project_type, start_date, end_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(customer_id)
    .bind(&period.project_type)
    .bind(period.start_date)
    .bind(period.end_date)
    .bind(&period.notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
