use std::sync::Arc;

use ordersync_core::{InvalidTimestampPolicy, NormalizedRow, ORDER_NUMBER_COLUMN};
use serde_json::json;

use super::*;
use crate::fixtures::{cells, order};
use crate::layout::SheetLayout;
use crate::memory::MemoryStore;

const FOLDER: &str = "folder";
const SHOP: &str = "maison.myshopify.com";
const JUNE: &str = "Commandes 2025-06";

fn push_with(store: &Arc<MemoryStore>) -> PushOrchestrator {
    let settings = Arc::new(SyncSettings {
        folder_id: FOLDER.to_owned(),
        reset_secret: "s3cret".to_owned(),
        accepted_source: SHOP.to_owned(),
        layout: SheetLayout::default(),
        default_start: "2025-04-01T00:00:00Z".to_owned(),
        timestamp_policy: InvalidTimestampPolicy::Abort,
    });
    PushOrchestrator::new(store.clone(), settings)
}

fn june_order(id: i64) -> ShopifyOrder {
    order(id, "2025-06-15T10:00:00+02:00")
}

#[tokio::test]
async fn untrusted_source_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let push = push_with(&store);

    for domain in [None, Some(""), Some("evil.myshopify.com")] {
        let err = push.run(domain, &june_order(1)).await.unwrap_err();
        assert!(matches!(err, SyncError::Unauthorized(_)), "got: {err:?}");
    }
    assert!(store.sheet_names(FOLDER).is_empty());
}

#[tokio::test]
async fn first_push_of_a_month_creates_sheet_with_two_rows() {
    let store = Arc::new(MemoryStore::new());

    let report = push_with(&store)
        .run(Some(SHOP), &june_order(1001))
        .await
        .unwrap();

    assert_eq!(report.action, PushAction::CreatedSheet);
    assert_eq!(report.month.as_str(), "2025-06");
    assert_eq!(report.sheet.name, JUNE);
    let values = store.values_of(FOLDER, JUNE).unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0], NormalizedRow::header());
    assert_eq!(values[1][0], "1001");
}

#[tokio::test]
async fn existing_empty_sheet_gets_header_and_row() {
    let store = Arc::new(MemoryStore::new());
    store.seed_sheet(FOLDER, JUNE, Vec::new());

    let report = push_with(&store)
        .run(Some(SHOP), &june_order(1001))
        .await
        .unwrap();

    assert_eq!(report.action, PushAction::WroteHeader);
    assert_eq!(store.sheet_names(FOLDER).len(), 1);
    assert_eq!(store.values_of(FOLDER, JUNE).unwrap().len(), 2);
}

#[tokio::test]
async fn pushing_same_order_twice_keeps_one_row() {
    let store = Arc::new(MemoryStore::new());
    let push = push_with(&store);

    let first = push.run(Some(SHOP), &june_order(1001)).await.unwrap();
    let second = push.run(Some(SHOP), &june_order(1001)).await.unwrap();

    assert_eq!(first.action, PushAction::CreatedSheet);
    assert_eq!(second.action, PushAction::Duplicate);
    let values = store.values_of(FOLDER, JUNE).unwrap();
    let matching = values.iter().skip(1).filter(|r| r[0] == "1001").count();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn new_order_is_appended_under_existing_header() {
    let store = Arc::new(MemoryStore::new());
    store.seed_sheet(
        FOLDER,
        JUNE,
        vec![
            cells(&["Total", "Note interne", ORDER_NUMBER_COLUMN]),
            cells(&["10.00", "appel client", "900"]),
        ],
    );

    let report = push_with(&store)
        .run(Some(SHOP), &june_order(1001))
        .await
        .unwrap();

    assert_eq!(report.action, PushAction::Appended);
    let values = store.values_of(FOLDER, JUNE).unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[2], cells(&["59.90", "", "1001"]));
}

#[tokio::test]
async fn orders_land_in_their_own_month() {
    let store = Arc::new(MemoryStore::new());
    let push = push_with(&store);

    push.run(Some(SHOP), &june_order(1)).await.unwrap();
    push.run(Some(SHOP), &order(2, "2025-07-01T00:15:00+02:00"))
        .await
        .unwrap();
    push.run(Some(SHOP), &june_order(3)).await.unwrap();

    assert_eq!(
        store.sheet_names(FOLDER),
        vec![JUNE, "Commandes 2025-07"]
    );
    assert_eq!(store.values_of(FOLDER, JUNE).unwrap().len(), 3);
}

#[tokio::test]
async fn widget_order_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let widget: ShopifyOrder = serde_json::from_value(json!({
        "id": 1001,
        "created_at": "2025-06-15T10:00:00+0000",
        "total_price": "59.90",
        "line_items": [{
            "title": "Widget",
            "quantity": 2,
            "price": "29.95",
            "price_set": { "shop_money": { "currency_code": "EUR" } }
        }]
    }))
    .unwrap();

    let report = push_with(&store).run(Some(SHOP), &widget).await.unwrap();

    assert_eq!(report.sheet.name, "Commandes 2025-06");
    let values = store.values_of(FOLDER, "Commandes 2025-06").unwrap();
    let header = &values[0];
    let column = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(values[1][column("Produits")], "Widget(2x29.95EUR)");
    assert_eq!(values[1][column("Date de commande")], "2025-06-15");
}

#[tokio::test]
async fn missing_timestamp_is_malformed_input() {
    let store = Arc::new(MemoryStore::new());
    let bad: ShopifyOrder = serde_json::from_value(json!({ "id": 5 })).unwrap();

    let err = push_with(&store).run(Some(SHOP), &bad).await.unwrap_err();

    assert!(matches!(err, SyncError::MalformedInput(_)), "got: {err:?}");
    assert!(store.sheet_names(FOLDER).is_empty());
}

#[tokio::test]
async fn store_failure_names_the_month() {
    let store = Arc::new(MemoryStore::new());
    store.seed_sheet(FOLDER, JUNE, vec![NormalizedRow::header()]);
    store.fail_write(JUNE);

    let err = push_with(&store)
        .run(Some(SHOP), &june_order(1001))
        .await
        .unwrap_err();

    match err {
        SyncError::OperationFailed { phase, months, .. } => {
            assert_eq!(phase, Phase::Writing);
            assert_eq!(months.len(), 1);
            assert_eq!(months[0].as_str(), "2025-06");
        }
        other => panic!("expected OperationFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn listing_failure_is_a_locating_failure() {
    let store = Arc::new(MemoryStore::new());
    store.fail_list();

    let err = push_with(&store)
        .run(Some(SHOP), &june_order(1001))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            SyncError::OperationFailed {
                phase: Phase::Locating,
                ..
            }
        ),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn duplicate_check_reads_once_and_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    store.seed_sheet(
        FOLDER,
        JUNE,
        vec![NormalizedRow::header(), cells(&["1001"])],
    );
    store.fail_write(JUNE);

    let report = push_with(&store)
        .run(Some(SHOP), &june_order(1001))
        .await
        .unwrap();

    assert_eq!(report.action, PushAction::Duplicate);
    assert_eq!(store.read_count(), 1);
}
