use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::entities::inventory_item::{self, Category, Entity as InventoryItem};
use crate::entities::usage_record::{self, Entity as UsageRecord};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::notifications::LowStockSignal;
use crate::services::forecasting::{breaches_low_stock, ForecastService, ItemForecast};

/// Fields for creating an inventory item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub sku: String,
    pub name: String,
    pub category: Category,
    pub location: Option<String>,
    pub quantity_on_hand: i32,
    pub safety_stock: i32,
    pub reorder_point: Option<i32>,
    pub max_level: Option<i32>,
    pub lead_time_days: i32,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub safety_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub max_level: Option<i32>,
    pub lead_time_days: Option<i32>,
}

/// Result of ingesting one usage event.
#[derive(Debug, Clone)]
pub struct UsageOutcome {
    pub record: usage_record::Model,
    pub item: inventory_item::Model,
    /// Whether this deduction tripped the low-stock policy.
    pub low_stock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriticalItem {
    pub sku: String,
    pub name: String,
    pub on_hand: i32,
    pub safety_stock: i32,
    pub days_to_depletion: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_items: u64,
    pub low_stock_items: u64,
    pub out_of_stock_items: u64,
    /// Units consumed across all items in the trailing seven days.
    pub recent_usage: i64,
    pub critical_items: Vec<CriticalItem>,
}

/// Service for managing inventory items and the usage ledger.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    forecasting: ForecastService,
}

impl InventoryService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        forecasting: ForecastService,
    ) -> Self {
        Self {
            db,
            event_sender,
            forecasting,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, input: NewItem) -> Result<inventory_item::Model, ServiceError> {
        if input.quantity_on_hand < 0 || input.safety_stock < 0 || input.lead_time_days < 0 {
            return Err(ServiceError::InvalidInput(
                "quantities must be non-negative".into(),
            ));
        }
        let existing = InventoryItem::find()
            .filter(inventory_item::Column::Sku.eq(input.sku.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "SKU {} already exists",
                input.sku
            )));
        }

        let model = inventory_item::ActiveModel {
            sku: Set(input.sku),
            name: Set(input.name),
            category: Set(input.category),
            location: Set(input.location),
            quantity_on_hand: Set(input.quantity_on_hand),
            safety_stock: Set(input.safety_stock),
            reorder_point: Set(input.reorder_point),
            max_level: Set(input.max_level),
            lead_time_days: Set(input.lead_time_days),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(item_id = model.id, sku = %model.sku, "Inventory item created");
        let _ = self
            .event_sender
            .send(Event::ItemCreated {
                item_id: model.id,
                sku: model.sku.clone(),
            })
            .await;
        Ok(model)
    }

    pub async fn get_item(&self, id: i64) -> Result<inventory_item::Model, ServiceError> {
        InventoryItem::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("inventory item {}", id)))
    }

    /// Lists inventory items with pagination. Pages are one-based.
    pub async fn list_items(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let page = page.max(1);
        let paginator = InventoryItem::find().paginate(&*self.db, limit.clamp(1, 500));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, patch))]
    pub async fn update_item(
        &self,
        id: i64,
        patch: ItemPatch,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item = self.get_item(id).await?;
        let mut active: inventory_item::ActiveModel = item.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(location) = patch.location {
            active.location = Set(Some(location));
        }
        if let Some(safety_stock) = patch.safety_stock {
            if safety_stock < 0 {
                return Err(ServiceError::InvalidInput(
                    "safety_stock must be non-negative".into(),
                ));
            }
            active.safety_stock = Set(safety_stock);
        }
        if let Some(reorder_point) = patch.reorder_point {
            active.reorder_point = Set(Some(reorder_point));
        }
        if let Some(max_level) = patch.max_level {
            active.max_level = Set(Some(max_level));
        }
        if let Some(lead_time_days) = patch.lead_time_days {
            if lead_time_days < 0 {
                return Err(ServiceError::InvalidInput(
                    "lead_time_days must be non-negative".into(),
                ));
            }
            active.lead_time_days = Set(lead_time_days);
        }
        Ok(active.update(&*self.db).await?)
    }

    /// Administrative removal. Usage history cascades with the item.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> Result<(), ServiceError> {
        let item = self.get_item(id).await?;
        let sku = item.sku.clone();
        item.delete(&*self.db).await?;
        info!(item_id = id, sku = %sku, "Inventory item deleted");
        let _ = self
            .event_sender
            .send(Event::ItemDeleted { item_id: id, sku })
            .await;
        Ok(())
    }

    /// Manual restock: a positive increment to the on-hand balance.
    #[instrument(skip(self))]
    pub async fn restock(
        &self,
        id: i64,
        quantity: i32,
        reason: Option<String>,
    ) -> Result<inventory_item::Model, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::InvalidInput(
                "restock quantity must be at least 1".into(),
            ));
        }
        let item = self.get_item(id).await?;
        let old_quantity = item.quantity_on_hand;
        let new_quantity = old_quantity.saturating_add(quantity);
        let mut active: inventory_item::ActiveModel = item.into();
        active.quantity_on_hand = Set(new_quantity);
        let updated = active.update(&*self.db).await?;

        let _ = self
            .event_sender
            .send(Event::StockAdjusted {
                item_id: id,
                old_quantity,
                new_quantity,
                reason: reason.unwrap_or_else(|| "restock".to_string()),
            })
            .await;
        Ok(updated)
    }

    /// Ingests one usage event: appends to the ledger and deducts stock in a
    /// single transaction, then re-evaluates the low-stock policy.
    ///
    /// The on-hand balance is clamped at zero; the ledger keeps the reported
    /// quantity either way since it records consumption, not balance.
    #[instrument(skip(self))]
    pub async fn record_usage(
        &self,
        item_id: i64,
        date: NaiveDate,
        qty_used: i32,
        notes: Option<String>,
    ) -> Result<UsageOutcome, ServiceError> {
        if qty_used < 1 {
            return Err(ServiceError::InvalidInput(
                "qty_used must be at least 1".into(),
            ));
        }

        let txn = self.db.begin().await?;

        let item = InventoryItem::find_by_id(item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("inventory item {}", item_id)))?;

        let record = usage_record::ActiveModel {
            inventory_item_id: Set(item_id),
            date: Set(date),
            qty_used: Set(qty_used),
            notes: Set(notes),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let old_quantity = item.quantity_on_hand;
        if qty_used > old_quantity {
            warn!(
                item_id,
                qty_used, old_quantity, "Usage exceeds on-hand stock; clamping balance at zero"
            );
        }
        let new_quantity = (old_quantity - qty_used).max(0);
        let mut active: inventory_item::ActiveModel = item.into();
        active.quantity_on_hand = Set(new_quantity);
        let item = active.update(&txn).await?;

        txn.commit().await?;

        let _ = self
            .event_sender
            .send(Event::UsageRecorded {
                item_id,
                date,
                qty_used,
                remaining: new_quantity,
            })
            .await;

        // Alert policy: re-evaluated after every deduction, firing once per
        // qualifying event.
        let figures = self.forecasting.figures_for(&item, None).await?;
        let low_stock = breaches_low_stock(&item, &figures);
        if low_stock {
            let _ = self
                .event_sender
                .send(Event::LowStockDetected(LowStockSignal {
                    item_id: item.id,
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    on_hand: item.quantity_on_hand,
                    reorder_point: figures.reorder_point,
                    days_to_depletion: figures.days_to_depletion,
                }))
                .await;
        }

        Ok(UsageOutcome {
            record,
            item,
            low_stock,
        })
    }

    /// Usage records across all items in the trailing `days` window.
    pub async fn list_usage(
        &self,
        days: u32,
    ) -> Result<Vec<usage_record::Model>, ServiceError> {
        let since = Utc::now().date_naive() - Duration::days(days as i64);
        let records = UsageRecord::find()
            .filter(usage_record::Column::Date.gte(since))
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    /// Items at or below their reorder point, with replenishment figures.
    #[instrument(skip(self))]
    pub async fn reorder_items(&self) -> Result<Vec<ItemForecast>, ServiceError> {
        let forecasts = self.forecasting.forecast_all(None).await?;
        Ok(forecasts
            .into_iter()
            .filter(|f| f.on_hand <= f.reorder_point)
            .collect())
    }

    /// Summary counts and the items needing immediate attention.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let total_items = InventoryItem::find().count(&*self.db).await?;
        let out_of_stock_items = InventoryItem::find()
            .filter(inventory_item::Column::QuantityOnHand.eq(0))
            .count(&*self.db)
            .await?;

        let forecasts = self.forecasting.forecast_all(None).await?;
        let low_stock_items = forecasts
            .iter()
            .filter(|f| f.on_hand <= f.reorder_point)
            .count() as u64;

        let recent_usage: i64 = self
            .list_usage(7)
            .await?
            .iter()
            .map(|r| r.qty_used as i64)
            .sum();

        let critical: Vec<inventory_item::Model> = InventoryItem::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .filter(|i| i.quantity_on_hand <= i.safety_stock)
            .collect();
        let mut critical_items = Vec::with_capacity(critical.len());
        for item in &critical {
            let figures = self.forecasting.figures_for(item, None).await?;
            critical_items.push(CriticalItem {
                sku: item.sku.clone(),
                name: item.name.clone(),
                on_hand: item.quantity_on_hand,
                safety_stock: item.safety_stock,
                days_to_depletion: figures.days_to_depletion,
            });
        }

        Ok(DashboardSummary {
            total_items,
            low_stock_items,
            out_of_stock_items,
            recent_usage,
            critical_items,
        })
    }
}
