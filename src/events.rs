use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::notifications::{LowStockNotifier, LowStockSignal};

/// Domain events emitted by the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ItemCreated {
        item_id: i64,
        sku: String,
    },
    ItemDeleted {
        item_id: i64,
        sku: String,
    },
    UsageRecorded {
        item_id: i64,
        date: NaiveDate,
        qty_used: i32,
        remaining: i32,
    },
    StockAdjusted {
        item_id: i64,
        old_quantity: i32,
        new_quantity: i32,
        reason: String,
    },
    LowStockDetected(LowStockSignal),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Builds a connected sender/receiver pair with a bounded buffer.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging every event and forwarding low-stock
/// signals to the configured notifier. Spawned once at startup; exits when
/// all senders are dropped.
pub async fn process_events(
    mut receiver: mpsc::Receiver<Event>,
    notifier: Arc<dyn LowStockNotifier>,
) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        debug!(?event, "Processing event");
        if let Event::LowStockDetected(signal) = &event {
            notifier.notify(signal).await;
        }
    }
    info!("Event processor stopped");
}
