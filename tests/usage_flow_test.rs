mod common;

use chrono::Utc;
use common::TestApp;
use sea_orm::{EntityTrait, PaginatorTrait};

use atelier_api::entities::usage_record::Entity as UsageRecord;
use atelier_api::errors::ServiceError;
use atelier_api::events::Event;

#[tokio::test]
async fn recording_usage_appends_ledger_and_deducts_stock() {
    let app = TestApp::new().await;
    let item = app.seed_item("OAK-PLANK", 50, 0, Some(5), None, 2).await;
    let today = Utc::now().date_naive();

    let outcome = app
        .state
        .services
        .inventory
        .record_usage(item.id, today, 8, Some("bench run".into()))
        .await
        .unwrap();

    assert_eq!(outcome.item.quantity_on_hand, 42);
    assert_eq!(outcome.record.qty_used, 8);
    assert_eq!(outcome.record.notes.as_deref(), Some("bench run"));
    assert!(!outcome.low_stock);

    let ledger = UsageRecord::find().count(&*app.state.db).await.unwrap();
    assert_eq!(ledger, 1);
}

#[tokio::test]
async fn non_positive_quantities_are_rejected_not_clamped() {
    let app = TestApp::new().await;
    let item = app.seed_item("WALNUT-SLAB", 50, 0, Some(5), None, 2).await;
    let today = Utc::now().date_naive();

    let err = app
        .state
        .services
        .inventory
        .record_usage(item.id, today, 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let err = app
        .state
        .services
        .inventory
        .record_usage(item.id, today, -3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    // Rejected events leave no ledger rows behind.
    let ledger = UsageRecord::find().count(&*app.state.db).await.unwrap();
    assert_eq!(ledger, 0);
}

#[tokio::test]
async fn unknown_item_leaves_no_partial_state() {
    let app = TestApp::new().await;
    let today = Utc::now().date_naive();

    let err = app
        .state
        .services
        .inventory
        .record_usage(9999, today, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let ledger = UsageRecord::find().count(&*app.state.db).await.unwrap();
    assert_eq!(ledger, 0);
}

#[tokio::test]
async fn oversized_deduction_clamps_balance_at_zero() {
    let app = TestApp::new().await;
    let item = app.seed_item("PINE-BOARD", 10, 0, Some(0), None, 0).await;
    let today = Utc::now().date_naive();

    let outcome = app
        .state
        .services
        .inventory
        .record_usage(item.id, today, 25, None)
        .await
        .unwrap();

    assert_eq!(outcome.item.quantity_on_hand, 0);
    // The ledger still carries the reported consumption.
    assert_eq!(outcome.record.qty_used, 25);
}

#[tokio::test]
async fn deduction_below_reorder_point_fires_low_stock_event() {
    let mut app = TestApp::new().await;
    let item = app.seed_item("BRASS-HINGE", 12, 0, Some(10), None, 2).await;
    let today = Utc::now().date_naive();

    let outcome = app
        .state
        .services
        .inventory
        .record_usage(item.id, today, 4, None)
        .await
        .unwrap();
    assert!(outcome.low_stock);

    let events = app.drain_events();
    let low_stock: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::LowStockDetected(signal) => Some(signal),
            _ => None,
        })
        .collect();
    assert_eq!(low_stock.len(), 1);
    assert_eq!(low_stock[0].sku, "BRASS-HINGE");
    assert_eq!(low_stock[0].on_hand, 8);
    assert_eq!(low_stock[0].reorder_point, 10);
}

#[tokio::test]
async fn every_qualifying_deduction_realerts() {
    let mut app = TestApp::new().await;
    let item = app.seed_item("FELT-PAD", 12, 0, Some(10), None, 1).await;
    let today = Utc::now().date_naive();

    for _ in 0..3 {
        app.state
            .services
            .inventory
            .record_usage(item.id, today, 2, None)
            .await
            .unwrap();
    }

    let alerts = app
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, Event::LowStockDetected(_)))
        .count();
    assert_eq!(alerts, 3);
}

#[tokio::test]
async fn imminent_depletion_alerts_above_reorder_point() {
    let mut app = TestApp::new().await;
    // rop pinned low, but consumption will empty the shelf within lead time.
    let item = app.seed_item("TEAK-VENEER", 21, 0, Some(1), None, 5).await;
    app.seed_steady_usage(item.id, 4, 30).await;
    let today = Utc::now().date_naive();

    let outcome = app
        .state
        .services
        .inventory
        .record_usage(item.id, today, 1, None)
        .await
        .unwrap();

    // on_hand 20 > rop 1, but 20 / ~4 per day <= 5-day lead time.
    assert!(outcome.item.quantity_on_hand > 1);
    assert!(outcome.low_stock);
    assert!(app
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::LowStockDetected(_))));
}

#[tokio::test]
async fn restock_increments_and_emits_adjustment() {
    let mut app = TestApp::new().await;
    let item = app.seed_item("CANE-WEBBING", 5, 0, Some(2), None, 1).await;

    let updated = app
        .state
        .services
        .inventory
        .restock(item.id, 40, Some("supplier delivery".into()))
        .await
        .unwrap();
    assert_eq!(updated.quantity_on_hand, 45);

    let adjusted = app.drain_events().into_iter().any(|e| {
        matches!(
            e,
            Event::StockAdjusted {
                old_quantity: 5,
                new_quantity: 45,
                ..
            }
        )
    });
    assert!(adjusted);

    let err = app
        .state
        .services
        .inventory
        .restock(item.id, 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn cascade_delete_removes_usage_history() {
    let app = TestApp::new().await;
    let item = app.seed_item("ASH-DOWEL", 30, 0, None, None, 1).await;
    app.seed_steady_usage(item.id, 2, 5).await;

    app.state
        .services
        .inventory
        .delete_item(item.id)
        .await
        .unwrap();

    let ledger = UsageRecord::find().count(&*app.state.db).await.unwrap();
    assert_eq!(ledger, 0);
}
