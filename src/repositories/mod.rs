use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::entities::usage_record::{self, Entity as UsageRecord};
use crate::errors::ServiceError;
use crate::forecast::UsagePoint;

/// Read access to the append-only usage ledger.
///
/// The forecasting layer depends on this trait instead of traversing ORM
/// relations, so history loading stays explicit and swappable in tests.
#[async_trait]
pub trait UsageHistoryRepository: Send + Sync {
    /// All usage records for one item dated `since` or later, oldest first.
    async fn usage_since(
        &self,
        item_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<usage_record::Model>, ServiceError>;

    /// All usage records across items dated `since` or later, oldest first.
    async fn all_usage_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<usage_record::Model>, ServiceError>;

    /// Per-day consumption totals for one item, oldest first. Days with no
    /// usage are absent from the result.
    async fn daily_totals(
        &self,
        item_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<UsagePoint>, ServiceError> {
        let records = self.usage_since(item_id, since).await?;
        Ok(aggregate_daily(&records))
    }
}

/// Collapses raw ledger rows into one total per calendar day.
pub fn aggregate_daily(records: &[usage_record::Model]) -> Vec<UsagePoint> {
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.date).or_insert(0) += record.qty_used as i64;
    }
    per_day
        .into_iter()
        .map(|(date, qty)| UsagePoint { date, qty })
        .collect()
}

/// sea-orm backed implementation over the shared connection pool.
#[derive(Clone)]
pub struct SqlUsageHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SqlUsageHistoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsageHistoryRepository for SqlUsageHistoryRepository {
    async fn usage_since(
        &self,
        item_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<usage_record::Model>, ServiceError> {
        let records = UsageRecord::find()
            .filter(usage_record::Column::InventoryItemId.eq(item_id))
            .filter(usage_record::Column::Date.gte(since))
            .order_by_asc(usage_record::Column::Date)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    async fn all_usage_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<usage_record::Model>, ServiceError> {
        let records = UsageRecord::find()
            .filter(usage_record::Column::Date.gte(since))
            .order_by_asc(usage_record::Column::Date)
            .all(&*self.db)
            .await?;
        Ok(records)
    }
}
