//! Ledger and list-query behavior over the seeded catalog.

use chrono::{Duration, Utc};

use stockroom_catalog::{CategoryDraft, Product, ProductListState};
use stockroom_core::{DomainError, UserId};
use stockroom_ledger::{MovementKind, MovementListState, MovementReason, StockAdjustment};
use stockroom_store::{
    CatalogStore, ConstraintViolation, InMemoryStore, LedgerStore, ReportStore, SeedData,
    StoreError, seed,
};

async fn seeded() -> (InMemoryStore, SeedData) {
    let store = InMemoryStore::new();
    let data = seed(&store).await.expect("seed");
    (store, data)
}

fn product_named<'a>(data: &'a SeedData, name: &str) -> &'a Product {
    data.products
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("seed has no product named {name}"))
}

fn worker(data: &SeedData) -> UserId {
    data.users
        .iter()
        .find(|u| u.name == "Stock Worker")
        .expect("seed has a stock worker")
        .id
}

fn adjust(
    product: &Product,
    user: UserId,
    kind: MovementKind,
    quantity: i64,
    reason: MovementReason,
) -> StockAdjustment {
    StockAdjustment::new(product.id, user, kind, quantity, reason).expect("valid adjustment")
}

#[tokio::test]
async fn outbound_then_overdraw_scenario() {
    let (store, data) = seeded().await;
    let laptop = product_named(&data, "Laptop Dell XPS 13");
    let user = worker(&data);
    assert_eq!(laptop.quantity, 15);

    // Sell 5: balance drops to 10 and exactly one movement is recorded.
    let outcome = store
        .adjust_stock(adjust(laptop, user, MovementKind::Out, 5, MovementReason::Sold))
        .await
        .expect("covered adjustment");
    assert_eq!(outcome.new_quantity, 10);
    assert_eq!(outcome.movement.kind, MovementKind::Out);
    assert_eq!(outcome.movement.quantity, 5);
    assert_eq!(outcome.movement.reason, MovementReason::Sold);
    assert_eq!(store.product(laptop.id).await.unwrap().unwrap().quantity, 10);

    let movements = store
        .list_movements(&MovementListState::new())
        .await
        .unwrap();
    assert_eq!(movements.meta.total, 1);

    // Try to sell 20: refused, and nothing changed anywhere.
    let err = store
        .adjust_stock(adjust(laptop, user, MovementKind::Out, 20, MovementReason::Sold))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(DomainError::InsufficientStock {
            available: 10,
            requested: 20,
        })
    ));
    assert_eq!(store.product(laptop.id).await.unwrap().unwrap().quantity, 10);
    let movements = store
        .list_movements(&MovementListState::new())
        .await
        .unwrap();
    assert_eq!(movements.meta.total, 1);
}

#[tokio::test]
async fn inbound_adjustment_adds_and_records() {
    let (store, data) = seeded().await;
    let tea = product_named(&data, "Green Tea Box");
    let user = worker(&data);

    let outcome = store
        .adjust_stock(adjust(tea, user, MovementKind::In, 7, MovementReason::Received))
        .await
        .unwrap();
    assert_eq!(outcome.new_quantity, tea.quantity + 7);

    let movements = store
        .list_movements(&MovementListState::new().with_product(Some(tea.id)))
        .await
        .unwrap();
    assert_eq!(movements.meta.total, 1);
    let row = &movements.rows[0];
    assert_eq!(row.movement.kind, MovementKind::In);
    assert_eq!(row.movement.quantity, 7);
    assert_eq!(row.product_name, "Green Tea Box");
    assert_eq!(row.user_name, "Stock Worker");
}

#[tokio::test]
async fn search_matches_name_or_sku_case_insensitively() {
    let (store, _) = seeded().await;

    let page = store
        .list_products(&ProductListState::new().with_search("iphone"))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.rows[0].product.name, "iPhone 14 Pro");

    // SKU fragments match the same OR group.
    let page = store
        .list_products(&ProductListState::new().with_search("dell-xps"))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.rows[0].product.name, "Laptop Dell XPS 13");
}

#[tokio::test]
async fn category_filter_is_independent_of_text() {
    let (store, data) = seeded().await;
    let electronics = data
        .categories
        .iter()
        .find(|c| c.name == "Electronics")
        .unwrap();

    let page = store
        .list_products(&ProductListState::new().with_category(Some(electronics.id)))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 3);
    for row in &page.rows {
        assert_eq!(row.product.category_id, electronics.id);
        assert_eq!(row.category_name, "Electronics");
    }

    // Both filters AND together.
    let page = store
        .list_products(
            &ProductListState::new()
                .with_category(Some(electronics.id))
                .with_search("laptop"),
        )
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
}

#[tokio::test]
async fn identical_filters_read_identically() {
    let (store, _) = seeded().await;
    let state = ProductListState::new().with_search("o");

    let first = store.list_products(&state).await.unwrap();
    let second = store.list_products(&state).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn filter_change_requeries_from_page_one() {
    let (store, _) = seeded().await;

    // Sitting on page 2 of the unfiltered list (10 products, page size 10:
    // page 2 is past the end).
    let state = ProductListState::new().with_page(2);
    let page = store.list_products(&state).await.unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.meta.total, 10);

    // Typing a search resets to page 1, so results are visible again.
    let state = state.with_search("laptop");
    assert_eq!(state.page(), 1);
    let page = store.list_products(&state).await.unwrap();
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.rows.len(), 1);
}

#[tokio::test]
async fn movement_filters_compose_and_order_newest_first() {
    let (store, data) = seeded().await;
    let laptop = product_named(&data, "Laptop Dell XPS 13");
    let tea = product_named(&data, "Green Tea Box");
    let user = worker(&data);

    for (product, kind, quantity) in [
        (laptop, MovementKind::In, 3),
        (tea, MovementKind::Out, 2),
        (laptop, MovementKind::Out, 1),
    ] {
        store
            .adjust_stock(adjust(product, user, kind, quantity, MovementReason::Adjustment))
            .await
            .unwrap();
    }

    let all = store
        .list_movements(&MovementListState::new())
        .await
        .unwrap();
    assert_eq!(all.meta.total, 3);
    // Newest first: the laptop `out` was recorded last.
    assert_eq!(all.rows[0].movement.quantity, 1);

    let laptop_only = store
        .list_movements(&MovementListState::new().with_product(Some(laptop.id)))
        .await
        .unwrap();
    assert_eq!(laptop_only.meta.total, 2);

    let laptop_out = store
        .list_movements(
            &MovementListState::new()
                .with_product(Some(laptop.id))
                .with_kind(Some(MovementKind::Out)),
        )
        .await
        .unwrap();
    assert_eq!(laptop_out.meta.total, 1);
    assert_eq!(laptop_out.rows[0].movement.quantity, 1);
}

#[tokio::test]
async fn movement_date_bounds_are_inclusive_calendar_dates() {
    let (store, data) = seeded().await;
    let laptop = product_named(&data, "Laptop Dell XPS 13");
    let user = worker(&data);

    store
        .adjust_stock(adjust(laptop, user, MovementKind::In, 1, MovementReason::Received))
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let tomorrow = today + Duration::days(1);
    let yesterday = today - Duration::days(1);

    let bounded = store
        .list_movements(
            &MovementListState::new()
                .with_date_from(Some(today))
                .with_date_to(Some(today)),
        )
        .await
        .unwrap();
    assert_eq!(bounded.meta.total, 1);

    let future = store
        .list_movements(&MovementListState::new().with_date_from(Some(tomorrow)))
        .await
        .unwrap();
    assert_eq!(future.meta.total, 0);

    let past = store
        .list_movements(&MovementListState::new().with_date_to(Some(yesterday)))
        .await
        .unwrap();
    assert_eq!(past.meta.total, 0);
}

#[tokio::test]
async fn seeded_category_deletion_rules() {
    let (store, data) = seeded().await;
    let electronics = data
        .categories
        .iter()
        .find(|c| c.name == "Electronics")
        .unwrap();

    let err = store.delete_category(electronics.id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Constraint(ConstraintViolation::CategoryInUse)
    ));
    assert!(store.category(electronics.id).await.unwrap().is_some());

    let empty = store
        .create_category(CategoryDraft::validate("Office Supplies").unwrap())
        .await
        .unwrap();
    store.delete_category(empty.id).await.unwrap();
    assert!(store.category(empty.id).await.unwrap().is_none());
}

#[tokio::test]
async fn dashboard_reflects_the_seeded_catalog() {
    let (store, data) = seeded().await;
    let laptop = product_named(&data, "Laptop Dell XPS 13");
    let user = worker(&data);

    store
        .adjust_stock(adjust(laptop, user, MovementKind::Out, 5, MovementReason::Sold))
        .await
        .unwrap();

    let stats = store.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_products, 10);
    assert_eq!(stats.total_categories, 5);
    // iPhone (8) and Samsung TV (5) seed below the threshold of 10.
    assert_eq!(stats.low_stock_products, 2);
    assert_eq!(stats.today_movements, 1);
    assert_eq!(stats.recent_movements.len(), 1);
    assert_eq!(
        stats
            .category_counts
            .iter()
            .map(|c| c.product_count)
            .sum::<u64>(),
        10
    );
}
