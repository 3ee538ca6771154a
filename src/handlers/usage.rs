use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::errors::ServiceError;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordUsageRequest {
    pub inventory_item_id: i64,
    /// Consumption date, day granularity
    pub date: NaiveDate,
    #[validate(range(min = 1))]
    pub qty_used: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UsageWindowQuery {
    /// Trailing window in days (default 90)
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyUsageQuery {
    /// Report date (default today)
    pub date: Option<NaiveDate>,
}

/// Create the usage router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_usage).post(record_usage))
        .route("/daily", get(get_daily_usage))
        .route("/trends", get(get_consumption_trends))
}

/// List usage records in a trailing window
#[utoipa::path(
    get,
    path = "/api/v1/usage",
    params(UsageWindowQuery),
    responses(
        (status = 200, description = "Usage records returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "usage"
)]
pub async fn list_usage(
    State(state): State<AppState>,
    Query(query): Query<UsageWindowQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let records = state
        .services
        .inventory
        .list_usage(query.days.unwrap_or(90))
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(records))))
}

/// Ingest a usage event
///
/// Appends to the ledger and deducts stock as one transaction, then runs the
/// low-stock check.
#[utoipa::path(
    post,
    path = "/api/v1/usage",
    request_body = RecordUsageRequest,
    responses(
        (status = 201, description = "Usage recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown inventory item", body = crate::errors::ErrorResponse)
    ),
    tag = "usage"
)]
pub async fn record_usage(
    State(state): State<AppState>,
    Json(payload): Json<RecordUsageRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let outcome = state
        .services
        .inventory
        .record_usage(
            payload.inventory_item_id,
            payload.date,
            payload.qty_used,
            payload.notes,
        )
        .await?;

    let response = json!({
        "success": true,
        "data": {
            "record": outcome.record,
            "remaining_stock": outcome.item.quantity_on_hand,
            "low_stock": outcome.low_stock,
        }
    });
    Ok((StatusCode::CREATED, Json(response)))
}

/// Per-item usage totals for one day
#[utoipa::path(
    get,
    path = "/api/v1/usage/daily",
    params(DailyUsageQuery),
    responses(
        (status = 200, description = "Daily usage report returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "usage"
)]
pub async fn get_daily_usage(
    State(state): State<AppState>,
    Query(query): Query<DailyUsageQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let report = state.services.forecasting.daily_usage(date).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(report))))
}

/// Consumption trends over a trailing window
#[utoipa::path(
    get,
    path = "/api/v1/usage/trends",
    params(UsageWindowQuery),
    responses(
        (status = 200, description = "Consumption trends returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "usage"
)]
pub async fn get_consumption_trends(
    State(state): State<AppState>,
    Query(query): Query<UsageWindowQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .forecasting
        .consumption_trends(query.days)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(report))))
}
