use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::ServiceError;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Averaging window in days; defaults to the configured window
    pub window: Option<u32>,
}

/// Create the forecast router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_forecast))
}

/// Replenishment forecast for every inventory item
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Per-item forecasts returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecast"
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let forecasts = state.services.forecasting.forecast_all(query.window).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(forecasts))))
}
