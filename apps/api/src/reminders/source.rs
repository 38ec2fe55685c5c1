use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::checkins::repository as checkins;
use crate::customers::repository as customers;
use crate::errors::AppError;
use crate::reminders::snapshot::Snapshot;

/// Where reminder handlers get their snapshot from.
///
/// Carried in `AppState` as `Arc<dyn SnapshotSource>`.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self) -> Result<Snapshot, AppError>;
}

/// Loads both collections with one query each, so reminder computation never
/// queries per customer.
pub struct PgSnapshotSource {
    pool: PgPool,
}

impl PgSnapshotSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotSource for PgSnapshotSource {
    async fn load(&self) -> Result<Snapshot, AppError> {
        let (customers, checkins) = tokio::try_join!(
            customers::list_customers_in_storage_order(&self.pool),
            checkins::list_all(&self.pool),
        )?;
        debug!(
            "Loaded snapshot: {} customers, {} check-ins",
            customers.len(),
            checkins.len()
        );
        Ok(Snapshot {
            customers,
            checkins,
        })
    }
}

/// In-memory snapshot, for handler tests.
#[cfg(test)]
pub struct StaticSnapshotSource(pub Snapshot);

#[cfg(test)]
#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn load(&self) -> Result<Snapshot, AppError> {
        Ok(self.0.clone())
    }
}
