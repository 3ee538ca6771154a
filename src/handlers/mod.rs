pub mod forecast;
pub mod health;
pub mod inventory;
pub mod reports;
pub mod usage;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::repositories::{SqlUsageHistoryRepository, UsageHistoryRepository};
use crate::services::forecasting::ForecastService;
use crate::services::inventory::InventoryService;
use crate::services::reports::ReportService;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub inventory: Arc<InventoryService>,
    pub forecasting: Arc<ForecastService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        let history: Arc<dyn UsageHistoryRepository> =
            Arc::new(SqlUsageHistoryRepository::new(db.clone()));
        let forecasting =
            ForecastService::new(db.clone(), history.clone(), config.forecast_window_days);
        let inventory = Arc::new(InventoryService::new(
            db.clone(),
            event_sender,
            forecasting.clone(),
        ));
        let reports = Arc::new(ReportService::new(db, forecasting.clone(), history));

        Self {
            inventory,
            forecasting: Arc::new(forecasting),
            reports,
        }
    }
}
