use chrono::{Duration, NaiveDate, Utc};
use futures::future::try_join_all;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::entities::inventory_item::{self, Entity as InventoryItem};
use crate::errors::ServiceError;
use crate::forecast::{self, ForecastFigures, ItemProfile};
use crate::repositories::{aggregate_daily, UsageHistoryRepository};

/// Per-item forecast as served to clients and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemForecast {
    pub sku: String,
    pub name: String,
    pub on_hand: i32,
    pub avg_daily_usage: f64,
    /// `null` when the usage rate is zero and no depletion is expected.
    pub days_to_depletion: Option<i64>,
    pub reorder_point: i32,
    pub suggested_order: i32,
    pub max_level: Option<i32>,
}

/// One item's consumption trend over the report window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsumptionTrend {
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub avg_daily_usage: f64,
    pub total_usage: i64,
    /// Least-squares slope of daily totals; positive means rising demand.
    pub trend: f64,
    pub days_to_depletion: Option<i64>,
    pub daily_usage: Vec<UsagePointDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsagePointDto {
    pub date: NaiveDate,
    pub qty: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendReport {
    pub period_days: u32,
    pub start_date: NaiveDate,
    pub trends: Vec<ConsumptionTrend>,
}

/// Usage aggregated for a single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyUsageEntry {
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub total_used: i64,
    pub remaining_stock: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyUsageReport {
    pub date: NaiveDate,
    pub entries: Vec<DailyUsageEntry>,
    pub total_quantity_used: i64,
}

/// Forecasting over the live inventory. Usage history always flows through
/// the injected repository; the arithmetic itself lives in [`crate::forecast`]
/// and never touches the database.
#[derive(Clone)]
pub struct ForecastService {
    db: Arc<DatabaseConnection>,
    history: Arc<dyn UsageHistoryRepository>,
    default_window_days: u32,
}

impl ForecastService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        history: Arc<dyn UsageHistoryRepository>,
        default_window_days: u32,
    ) -> Self {
        Self {
            db,
            history,
            default_window_days,
        }
    }

    pub fn window_or_default(&self, window: Option<u32>) -> u32 {
        window.unwrap_or(self.default_window_days)
    }

    fn profile_of(item: &inventory_item::Model) -> ItemProfile {
        ItemProfile {
            on_hand: item.quantity_on_hand,
            safety_stock: item.safety_stock,
            reorder_point: item.reorder_point,
            max_level: item.max_level,
            lead_time_days: item.lead_time_days,
        }
    }

    /// Raw forecast figures for one item, used by the alert policy.
    pub async fn figures_for(
        &self,
        item: &inventory_item::Model,
        window: Option<u32>,
    ) -> Result<ForecastFigures, ServiceError> {
        let window = self.window_or_default(window);
        let today = Utc::now().date_naive();
        let since = today - Duration::days(window as i64);
        let points = self.history.daily_totals(item.id, since).await?;
        Ok(forecast::forecast(
            &Self::profile_of(item),
            &points,
            today,
            window,
        ))
    }

    /// Client-facing forecast for one item.
    pub async fn forecast_item(
        &self,
        item: &inventory_item::Model,
        window: Option<u32>,
    ) -> Result<ItemForecast, ServiceError> {
        let figures = self.figures_for(item, window).await?;
        Ok(ItemForecast {
            sku: item.sku.clone(),
            name: item.name.clone(),
            on_hand: item.quantity_on_hand,
            avg_daily_usage: figures.avg_daily_usage,
            days_to_depletion: figures.days_to_depletion,
            reorder_point: figures.reorder_point,
            suggested_order: figures.suggested_order,
            max_level: item.max_level,
        })
    }

    /// Forecasts for every inventory item.
    #[instrument(skip(self))]
    pub async fn forecast_all(&self, window: Option<u32>) -> Result<Vec<ItemForecast>, ServiceError> {
        let items = InventoryItem::find().all(&*self.db).await?;
        try_join_all(items.iter().map(|item| self.forecast_item(item, window))).await
    }

    /// Consumption trends across all items with recorded usage in the window.
    #[instrument(skip(self))]
    pub async fn consumption_trends(&self, window: Option<u32>) -> Result<TrendReport, ServiceError> {
        let window = self.window_or_default(window);
        let today = Utc::now().date_naive();
        let since = today - Duration::days(window as i64);

        let items = InventoryItem::find().all(&*self.db).await?;
        let by_id: BTreeMap<i64, &inventory_item::Model> =
            items.iter().map(|i| (i.id, i)).collect();

        let records = self.history.all_usage_since(since).await?;
        let mut grouped: BTreeMap<i64, Vec<crate::entities::usage_record::Model>> = BTreeMap::new();
        for record in records {
            grouped
                .entry(record.inventory_item_id)
                .or_default()
                .push(record);
        }

        let mut trends = Vec::with_capacity(grouped.len());
        for (item_id, records) in grouped {
            let Some(item) = by_id.get(&item_id) else {
                continue;
            };
            let daily = aggregate_daily(&records);
            let series: Vec<f64> = daily.iter().map(|p| p.qty as f64).collect();
            let avg = forecast::average_daily_usage(&daily, today, window);
            trends.push(ConsumptionTrend {
                item_id,
                sku: item.sku.clone(),
                name: item.name.clone(),
                avg_daily_usage: forecast::round2(avg),
                total_usage: daily.iter().map(|p| p.qty).sum(),
                trend: forecast::trend_slope(&series),
                days_to_depletion: forecast::days_to_depletion(item.quantity_on_hand, avg),
                daily_usage: daily
                    .iter()
                    .map(|p| UsagePointDto {
                        date: p.date,
                        qty: p.qty,
                    })
                    .collect(),
            });
        }

        Ok(TrendReport {
            period_days: window,
            start_date: since,
            trends,
        })
    }

    /// Per-item usage totals for one calendar day.
    #[instrument(skip(self))]
    pub async fn daily_usage(&self, date: NaiveDate) -> Result<DailyUsageReport, ServiceError> {
        let items = InventoryItem::find().all(&*self.db).await?;
        let by_id: BTreeMap<i64, &inventory_item::Model> =
            items.iter().map(|i| (i.id, i)).collect();

        let records = self.history.all_usage_since(date).await?;
        let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
        for record in records.iter().filter(|r| r.date == date) {
            *totals.entry(record.inventory_item_id).or_insert(0) += record.qty_used as i64;
        }

        let mut entries = Vec::with_capacity(totals.len());
        for (item_id, total_used) in &totals {
            let Some(item) = by_id.get(item_id) else {
                continue;
            };
            entries.push(DailyUsageEntry {
                item_id: *item_id,
                sku: item.sku.clone(),
                name: item.name.clone(),
                total_used: *total_used,
                remaining_stock: item.quantity_on_hand,
            });
        }

        Ok(DailyUsageReport {
            date,
            total_quantity_used: entries.iter().map(|e| e.total_used).sum(),
            entries,
        })
    }
}

/// Low-stock check on entity models, used by the alert policy after each
/// deduction.
pub fn breaches_low_stock(item: &inventory_item::Model, figures: &ForecastFigures) -> bool {
    forecast::breaches_low_stock(&ForecastService::profile_of(item), figures)
}
