use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Payload handed to the notifier when an item crosses its low-stock
/// threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockSignal {
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub on_hand: i32,
    pub reorder_point: i32,
    pub days_to_depletion: Option<i64>,
}

/// Destination for low-stock alerts. Transport (mail, chat, webhooks) is a
/// deployment concern; the service only promises to call `notify` once per
/// qualifying deduction event.
#[async_trait]
pub trait LowStockNotifier: Send + Sync {
    async fn notify(&self, signal: &LowStockSignal);
}

/// Notifier that records alerts in the application log.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl LowStockNotifier for LogNotifier {
    async fn notify(&self, signal: &LowStockSignal) {
        warn!(
            sku = %signal.sku,
            name = %signal.name,
            on_hand = signal.on_hand,
            reorder_point = signal.reorder_point,
            days_to_depletion = ?signal.days_to_depletion,
            "Low stock: replenishment needed"
        );
    }
}
