use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::inventory_item::Category;
use crate::errors::ServiceError;
use crate::services::inventory::{ItemPatch, NewItem};
use crate::{ApiResponse, AppState, ListQuery};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Category,
    pub location: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity_on_hand: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub safety_stock: i32,
    #[validate(range(min = 0))]
    pub reorder_point: Option<i32>,
    #[validate(range(min = 0))]
    pub max_level: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub lead_time_days: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub safety_stock: Option<i32>,
    #[validate(range(min = 0))]
    pub reorder_point: Option<i32>,
    #[validate(range(min = 0))]
    pub max_level: Option<i32>,
    #[validate(range(min = 0))]
    pub lead_time_days: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RestockRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub reason: Option<String>,
}

/// Create the inventory router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route("/dashboard", get(get_dashboard))
        .route("/reorder", get(get_reorder_items))
        .route(
            "/{id}",
            get(get_inventory)
                .put(update_inventory)
                .delete(delete_inventory),
        )
        .route("/{id}/restock", post(restock_inventory))
}

/// List inventory items with pagination
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(ListQuery),
    responses(
        (status = 200, description = "Inventory list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .inventory
        .list_items(query.page, query.limit)
        .await?;

    let response = json!({
        "success": true,
        "data": {
            "items": items,
            "total": total,
            "page": query.page,
            "limit": query.limit,
        }
    });
    Ok((StatusCode::OK, Json(response)))
}

/// Create a new inventory item
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 201, description = "Inventory item created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate SKU", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let item = state
        .services
        .inventory
        .create_item(NewItem {
            sku: payload.sku,
            name: payload.name,
            category: payload.category,
            location: payload.location,
            quantity_on_hand: payload.quantity_on_hand,
            safety_stock: payload.safety_stock,
            reorder_point: payload.reorder_point,
            max_level: payload.max_level,
            lead_time_days: payload.lead_time_days,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// Get one inventory item
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = i64, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(item))))
}

/// Update an inventory item
#[utoipa::path(
    put,
    path = "/api/v1/inventory/{id}",
    params(("id" = i64, Path, description = "Inventory item ID")),
    request_body = UpdateInventoryItemRequest,
    responses(
        (status = 200, description = "Inventory item updated"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInventoryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let item = state
        .services
        .inventory
        .update_item(
            id,
            ItemPatch {
                name: payload.name,
                category: payload.category,
                location: payload.location,
                safety_stock: payload.safety_stock,
                reorder_point: payload.reorder_point,
                max_level: payload.max_level,
                lead_time_days: payload.lead_time_days,
            },
        )
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(item))))
}

/// Delete an inventory item (administrative; cascades its usage history)
#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    params(("id" = i64, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_inventory(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.inventory.delete_item(id).await?;
    let response = json!({
        "message": format!("Inventory item {} has been deleted", id),
        "deleted_id": id
    });
    Ok((StatusCode::OK, Json(response)))
}

/// Manual restock
#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/restock",
    params(("id" = i64, Path, description = "Inventory item ID")),
    request_body = RestockRequest,
    responses(
        (status = 200, description = "Stock incremented"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn restock_inventory(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let item = state
        .services
        .inventory
        .restock(id, payload.quantity, payload.reason)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(item))))
}

/// Items at or below their reorder point
#[utoipa::path(
    get,
    path = "/api/v1/inventory/reorder",
    responses(
        (status = 200, description = "Reorder candidates returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_reorder_items(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.services.inventory.reorder_items().await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(items))))
}

/// Inventory dashboard summary
#[utoipa::path(
    get,
    path = "/api/v1/inventory/dashboard",
    responses(
        (status = 200, description = "Dashboard summary returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.inventory.dashboard().await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(summary))))
}
