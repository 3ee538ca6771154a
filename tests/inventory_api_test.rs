mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::Utc;
use common::TestApp;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_and_list_inventory() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/inventory",
            json!({
                "sku": "OAK-PLANK",
                "name": "Oak plank 25mm",
                "category": "raw",
                "quantity_on_hand": 120,
                "safety_stock": 15,
                "lead_time_days": 7
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["sku"], json!("OAK-PLANK"));
    assert_eq!(body["data"]["quantity_on_hand"], json!(120));

    // Duplicate SKU conflicts.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/inventory",
            json!({
                "sku": "OAK-PLANK",
                "name": "Another oak plank",
                "category": "raw"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/inventory?page=1&limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["items"][0]["sku"], json!("OAK-PLANK"));
}

#[tokio::test]
async fn invalid_item_payload_is_rejected() {
    let app = TestApp::new().await;

    // Negative quantity fails validation at the boundary.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/inventory",
            json!({
                "sku": "BAD-ITEM",
                "name": "Bad item",
                "category": "raw",
                "quantity_on_hand": -5
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn usage_ingestion_over_http() {
    let app = TestApp::new().await;
    let item = app.seed_item("WALNUT-SLAB", 30, 0, Some(5), None, 2).await;
    let today = Utc::now().date_naive();

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/usage",
            json!({
                "inventory_item_id": item.id,
                "date": today.to_string(),
                "qty_used": 12
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["remaining_stock"], json!(18));
    assert_eq!(body["data"]["low_stock"], json!(false));

    // Zero quantity is rejected, not clamped.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/usage",
            json!({
                "inventory_item_id": item.id,
                "date": today.to_string(),
                "qty_used": 0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown item.
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/usage",
            json!({
                "inventory_item_id": 424242,
                "date": today.to_string(),
                "qty_used": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forecast_endpoint_returns_expected_fields() {
    let app = TestApp::new().await;
    let item = app.seed_item("PINE-BOARD", 50, 10, None, None, 5).await;
    app.seed_steady_usage(item.id, 4, 30).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/forecast"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let forecast = &body["data"][0];
    assert_eq!(forecast["sku"], json!("PINE-BOARD"));
    assert_eq!(forecast["on_hand"], json!(50));
    assert_eq!(forecast["avg_daily_usage"], json!(4.0));
    assert_eq!(forecast["reorder_point"], json!(30));
    assert_eq!(forecast["suggested_order"], json!(0));
    assert_eq!(forecast["days_to_depletion"], json!(13));
}

#[tokio::test]
async fn zero_usage_serializes_null_depletion() {
    let app = TestApp::new().await;
    app.seed_item("BRASS-HINGE", 100, 5, None, None, 3).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/forecast"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["days_to_depletion"], Value::Null);
}

#[tokio::test]
async fn replenishment_csv_has_field_name_headers() {
    let app = TestApp::new().await;
    let item = app.seed_item("OAK-PLANK", 20, 10, None, None, 5).await;
    app.seed_steady_usage(item.id, 4, 30).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/reports/replenishment.csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let text = body_text(response).await;
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "sku,name,on_hand,avg_daily_usage,days_to_depletion,reorder_point,suggested_order"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("OAK-PLANK,"));
    assert!(row.ends_with(",30,20"));
}

#[tokio::test]
async fn stock_and_usage_csv_exports() {
    let app = TestApp::new().await;
    let item = app.seed_item("WALNUT-SLAB", 75, 5, Some(12), Some(90), 4).await;
    let today = Utc::now().date_naive();
    app.seed_usage(item.id, today, 6).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/reports/stock.csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.starts_with(
        "sku,name,category,location,quantity_on_hand,safety_stock,reorder_point,max_level,lead_time_days"
    ));
    assert!(text.contains("WALNUT-SLAB"));
    assert!(text.contains(",raw,"));

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/reports/usage.csv?days=30"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.starts_with("date,sku,qty_used,notes"));
    assert!(text.contains("WALNUT-SLAB,6"));
}

#[tokio::test]
async fn dashboard_and_reorder_endpoints() {
    let app = TestApp::new().await;
    // Below its explicit reorder point and out of stock respectively.
    let low = app.seed_item("FELT-PAD", 3, 2, Some(10), Some(50), 2).await;
    app.seed_item("CANE-WEBBING", 0, 0, None, None, 1).await;
    app.seed_item("TEAK-VENEER", 500, 5, Some(10), None, 2).await;
    let today = Utc::now().date_naive();
    app.seed_usage(low.id, today, 2).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/inventory/reorder"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let skus: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["sku"].as_str().unwrap())
        .collect();
    assert!(skus.contains(&"FELT-PAD"));
    assert!(skus.contains(&"CANE-WEBBING"));
    assert!(!skus.contains(&"TEAK-VENEER"));
    let felt = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["sku"] == json!("FELT-PAD"))
        .unwrap();
    // Fill back up to the explicit max level.
    assert_eq!(felt["suggested_order"], json!(47));

    let response = app
        .router
        .clone()
        .oneshot(get("/api/v1/inventory/dashboard"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total_items"], json!(3));
    assert_eq!(body["data"]["out_of_stock_items"], json!(1));
    assert_eq!(body["data"]["recent_usage"], json!(2));
    let critical: Vec<&str> = body["data"]["critical_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["sku"].as_str().unwrap())
        .collect();
    assert!(critical.contains(&"CANE-WEBBING"));
}

#[tokio::test]
async fn health_and_openapi_endpoints() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("up"));
    assert_eq!(body["database"], json!("up"));

    let response = app
        .router
        .clone()
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/v1/forecast"].is_object());
}
