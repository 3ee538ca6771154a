use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::entities::inventory_item::{Category, Entity as InventoryItem};
use crate::errors::ServiceError;
use crate::repositories::UsageHistoryRepository;
use crate::services::forecasting::{ForecastService, ItemForecast};

/// Flattened replenishment row for CSV export.
#[derive(Debug, Serialize)]
struct ReplenishmentRow {
    sku: String,
    name: String,
    on_hand: i32,
    avg_daily_usage: f64,
    days_to_depletion: Option<i64>,
    reorder_point: i32,
    suggested_order: i32,
}

#[derive(Debug, Serialize)]
struct StockRow {
    sku: String,
    name: String,
    category: Category,
    location: Option<String>,
    quantity_on_hand: i32,
    safety_stock: i32,
    reorder_point: Option<i32>,
    max_level: Option<i32>,
    lead_time_days: i32,
}

#[derive(Debug, Serialize)]
struct UsageRow {
    date: NaiveDate,
    sku: String,
    qty_used: i32,
    notes: Option<String>,
}

/// Report assembly over the forecasting engine: JSON for dashboards, CSV
/// for spreadsheet export. Headers come from the row struct's field names,
/// so CSV and JSON shapes stay in lockstep.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
    forecasting: ForecastService,
    history: Arc<dyn UsageHistoryRepository>,
}

impl ReportService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        forecasting: ForecastService,
        history: Arc<dyn UsageHistoryRepository>,
    ) -> Self {
        Self {
            db,
            forecasting,
            history,
        }
    }

    /// Per-item replenishment report.
    #[instrument(skip(self))]
    pub async fn replenishment(
        &self,
        window: Option<u32>,
    ) -> Result<Vec<ItemForecast>, ServiceError> {
        self.forecasting.forecast_all(window).await
    }

    #[instrument(skip(self))]
    pub async fn replenishment_csv(&self, window: Option<u32>) -> Result<String, ServiceError> {
        let rows: Vec<ReplenishmentRow> = self
            .replenishment(window)
            .await?
            .into_iter()
            .map(|f| ReplenishmentRow {
                sku: f.sku,
                name: f.name,
                on_hand: f.on_hand,
                avg_daily_usage: f.avg_daily_usage,
                days_to_depletion: f.days_to_depletion,
                reorder_point: f.reorder_point,
                suggested_order: f.suggested_order,
            })
            .collect();
        to_csv(&rows)
    }

    /// Current stock levels, one row per item.
    #[instrument(skip(self))]
    pub async fn stock_csv(&self) -> Result<String, ServiceError> {
        let rows: Vec<StockRow> = InventoryItem::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|i| StockRow {
                sku: i.sku,
                name: i.name,
                category: i.category,
                location: i.location,
                quantity_on_hand: i.quantity_on_hand,
                safety_stock: i.safety_stock,
                reorder_point: i.reorder_point,
                max_level: i.max_level,
                lead_time_days: i.lead_time_days,
            })
            .collect();
        to_csv(&rows)
    }

    /// Raw usage ledger over the trailing `days` window.
    #[instrument(skip(self))]
    pub async fn usage_csv(&self, days: u32) -> Result<String, ServiceError> {
        let since = Utc::now().date_naive() - Duration::days(days as i64);
        let skus: HashMap<i64, String> = InventoryItem::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|i| (i.id, i.sku))
            .collect();

        let rows: Vec<UsageRow> = self
            .history
            .all_usage_since(since)
            .await?
            .into_iter()
            .map(|r| UsageRow {
                date: r.date,
                sku: skus
                    .get(&r.inventory_item_id)
                    .cloned()
                    .unwrap_or_else(|| r.inventory_item_id.to_string()),
                qty_used: r.qty_used,
                notes: r.notes,
            })
            .collect();
        to_csv(&rows)
    }
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ServiceError::InternalError(format!("CSV serialization: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::InternalError(format!("CSV flush: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::InternalError(format!("CSV encoding: {}", e)))
}
