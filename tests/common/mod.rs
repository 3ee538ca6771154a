#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;

use atelier_api::{
    config::AppConfig,
    db,
    entities::{inventory_item, usage_record},
    events::{self, Event},
    AppServices, AppState,
};

/// Test harness: application state over a fresh in-memory SQLite database.
///
/// The event receiver is kept here instead of being drained by the normal
/// processor task, so tests can assert on emitted events.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub events: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:", "127.0.0.1", 18080);
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let db = db::connect(&cfg).await.expect("failed to open database");
        db::run_migrations(&db).await.expect("failed to migrate");
        let db = Arc::new(db);

        let (event_sender, event_rx) = events::channel(64);
        let services = AppServices::new(db.clone(), event_sender.clone(), &cfg);
        let state = AppState {
            db,
            config: cfg,
            event_sender,
            services,
        };
        let router = atelier_api::app_router(state.clone());

        Self {
            router,
            state,
            events: event_rx,
        }
    }

    /// Inserts an inventory item directly, bypassing the HTTP surface.
    pub async fn seed_item(
        &self,
        sku: &str,
        on_hand: i32,
        safety_stock: i32,
        reorder_point: Option<i32>,
        max_level: Option<i32>,
        lead_time_days: i32,
    ) -> inventory_item::Model {
        inventory_item::ActiveModel {
            sku: Set(sku.to_string()),
            name: Set(format!("Test item {}", sku)),
            category: Set(inventory_item::Category::Raw),
            location: Set(None),
            quantity_on_hand: Set(on_hand),
            safety_stock: Set(safety_stock),
            reorder_point: Set(reorder_point),
            max_level: Set(max_level),
            lead_time_days: Set(lead_time_days),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("failed to seed item")
    }

    /// Appends a ledger row without touching the stock balance, for building
    /// usage history in forecasting tests.
    pub async fn seed_usage(&self, item_id: i64, date: NaiveDate, qty_used: i32) {
        usage_record::ActiveModel {
            inventory_item_id: Set(item_id),
            date: Set(date),
            qty_used: Set(qty_used),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("failed to seed usage");
    }

    /// Seeds `qty` units of usage per day for each of the trailing `days`.
    pub async fn seed_steady_usage(&self, item_id: i64, qty: i32, days: u32) {
        let today = Utc::now().date_naive();
        for i in 0..days {
            self.seed_usage(item_id, today - Duration::days(i as i64), qty)
                .await;
        }
    }

    /// Drains every event emitted so far.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}
