//! Atelier API Library
//!
//! Backend for a furniture workshop: inventory control, usage tracking, and
//! replenishment forecasting.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod forecast;
pub mod handlers;
pub mod migrator;
pub mod notifications;
pub mod openapi;
pub mod repositories;
pub mod services;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{IntoParams, ToSchema};

pub use handlers::AppServices;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
}

/// Common query parameters for list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

/// Common response wrapper for JSON endpoints.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, errors::ServiceError>;

/// Assembles the full application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/inventory", handlers::inventory::router())
        .nest("/api/v1/usage", handlers::usage::router())
        .nest("/api/v1/forecast", handlers::forecast::router())
        .nest("/api/v1/reports", handlers::reports::router())
        .nest("/health", handlers::health::router())
        .route("/api-docs/openapi.json", get(openapi::serve_openapi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
