use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier API",
        description = "Inventory control, usage tracking, and replenishment forecasting for a furniture workshop"
    ),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::create_inventory,
        crate::handlers::inventory::get_inventory,
        crate::handlers::inventory::update_inventory,
        crate::handlers::inventory::delete_inventory,
        crate::handlers::inventory::restock_inventory,
        crate::handlers::inventory::get_reorder_items,
        crate::handlers::inventory::get_dashboard,
        crate::handlers::usage::list_usage,
        crate::handlers::usage::record_usage,
        crate::handlers::usage::get_daily_usage,
        crate::handlers::usage::get_consumption_trends,
        crate::handlers::forecast::get_forecast,
        crate::handlers::reports::get_replenishment,
        crate::handlers::reports::get_replenishment_csv,
        crate::handlers::reports::get_stock_csv,
        crate::handlers::reports::get_usage_csv,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::inventory_item::Category,
        crate::handlers::health::HealthInfo,
        crate::handlers::health::HealthStatus,
        crate::handlers::inventory::CreateInventoryItemRequest,
        crate::handlers::inventory::UpdateInventoryItemRequest,
        crate::handlers::inventory::RestockRequest,
        crate::handlers::usage::RecordUsageRequest,
        crate::services::forecasting::ItemForecast,
        crate::services::forecasting::ConsumptionTrend,
        crate::services::forecasting::TrendReport,
        crate::services::forecasting::UsagePointDto,
        crate::services::forecasting::DailyUsageEntry,
        crate::services::forecasting::DailyUsageReport,
        crate::services::inventory::CriticalItem,
        crate::services::inventory::DashboardSummary,
    )),
    tags(
        (name = "inventory", description = "Inventory item management"),
        (name = "usage", description = "Usage ledger ingestion and reporting"),
        (name = "forecast", description = "Replenishment forecasting"),
        (name = "reports", description = "JSON and CSV exports"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serves the aggregated OpenAPI document.
pub async fn serve_openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
