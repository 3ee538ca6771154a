use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ServiceError;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportWindowQuery {
    /// Averaging window in days; defaults to the configured window
    pub window: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UsageExportQuery {
    /// Trailing window in days (default 90)
    pub days: Option<u32>,
}

/// Create the reports router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/replenishment", get(get_replenishment))
        .route("/replenishment.csv", get(get_replenishment_csv))
        .route("/stock.csv", get(get_stock_csv))
        .route("/usage.csv", get(get_usage_csv))
}

fn csv_response(filename: &str, body: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Replenishment report (JSON)
#[utoipa::path(
    get,
    path = "/api/v1/reports/replenishment",
    params(ReportWindowQuery),
    responses(
        (status = 200, description = "Replenishment report returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_replenishment(
    State(state): State<AppState>,
    Query(query): Query<ReportWindowQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state.services.reports.replenishment(query.window).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(report))))
}

/// Replenishment report (CSV download)
#[utoipa::path(
    get,
    path = "/api/v1/reports/replenishment.csv",
    params(ReportWindowQuery),
    responses(
        (status = 200, description = "CSV export", body = String, content_type = "text/csv"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_replenishment_csv(
    State(state): State<AppState>,
    Query(query): Query<ReportWindowQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let body = state
        .services
        .reports
        .replenishment_csv(query.window)
        .await?;
    Ok(csv_response("replenishment_plan.csv", body))
}

/// Stock levels (CSV download)
#[utoipa::path(
    get,
    path = "/api/v1/reports/stock.csv",
    responses(
        (status = 200, description = "CSV export", body = String, content_type = "text/csv"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_stock_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let body = state.services.reports.stock_csv().await?;
    Ok(csv_response("stock_levels.csv", body))
}

/// Usage ledger (CSV download)
#[utoipa::path(
    get,
    path = "/api/v1/reports/usage.csv",
    params(UsageExportQuery),
    responses(
        (status = 200, description = "CSV export", body = String, content_type = "text/csv"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_usage_csv(
    State(state): State<AppState>,
    Query(query): Query<UsageExportQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let body = state
        .services
        .reports
        .usage_csv(query.days.unwrap_or(90))
        .await?;
    Ok(csv_response("usage_history.csv", body))
}
