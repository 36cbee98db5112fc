//! Settlement engine flows over the in-memory store: revenue distribution,
//! accumulation across sales, and behavior under concurrent duplicate
//! deliveries.

use chrono::Utc;
use librepay::application::settlement::SettlementEngine;
use librepay::domain::money::Balance;
use librepay::domain::ports::{SaleStore, SettlementStore};
use librepay::domain::sale::Sale;
use librepay::domain::settlement::{Disposition, SettlementOutcome};
use librepay::infrastructure::in_memory::InMemoryStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn engine_over(store: &InMemoryStore) -> SettlementEngine {
    SettlementEngine::new(Box::new(store.clone()), Box::new(store.clone()))
}

async fn seed_sale(store: &InMemoryStore, id: &str, author_id: &str, amount: Decimal) {
    let sale = Sale::pending(
        id,
        "book-1",
        author_id,
        amount.try_into().unwrap(),
        Utc::now(),
    );
    store.insert(sale).await.unwrap();
}

#[tokio::test]
async fn test_shares_sum_back_to_the_sale_amount() {
    for amount in [dec!(1000), dec!(999.99), dec!(0.03)] {
        let store = InMemoryStore::new();
        seed_sale(&store, "tx1", "author-1", amount).await;
        let engine = engine_over(&store);

        engine.settle("tx1", Disposition::Approved).await.unwrap();

        let author = store.author("author-1").await.unwrap().unwrap();
        let platform = store.platform().await.unwrap();
        assert_eq!(
            author.revenue + platform.revenue,
            Balance::new(amount),
            "shares of {amount} must sum back to the amount"
        );
    }
}

#[tokio::test]
async fn test_revenue_accumulates_across_sales() {
    let store = InMemoryStore::new();
    seed_sale(&store, "tx1", "author-1", dec!(1000)).await;
    seed_sale(&store, "tx2", "author-1", dec!(500)).await;
    seed_sale(&store, "tx3", "author-2", dec!(100)).await;
    let engine = engine_over(&store);

    engine.settle("tx1", Disposition::Approved).await.unwrap();
    engine.settle("tx2", Disposition::Approved).await.unwrap();
    engine.settle("tx3", Disposition::Approved).await.unwrap();

    let first = store.author("author-1").await.unwrap().unwrap();
    assert_eq!(first.revenue, Balance::new(dec!(1050.0)));
    assert_eq!(first.sales, 2);

    let second = store.author("author-2").await.unwrap().unwrap();
    assert_eq!(second.revenue, Balance::new(dec!(70.0)));
    assert_eq!(second.sales, 1);

    // Platform collects 30% of everything.
    assert_eq!(
        store.platform().await.unwrap().revenue,
        Balance::new(dec!(480.0))
    );
}

#[tokio::test]
async fn test_concurrent_duplicate_callbacks_settle_once() {
    let store = InMemoryStore::new();
    seed_sale(&store, "tx1", "author-1", dec!(1000)).await;
    let engine = Arc::new(engine_over(&store));

    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.settle("tx1", Disposition::Approved).await.unwrap() }
    });
    let second = tokio::spawn({
        let engine = engine.clone();
        async move { engine.settle("tx1", Disposition::Approved).await.unwrap() }
    });

    let outcomes = [first.await.unwrap(), second.await.unwrap()];
    let applied = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, SettlementOutcome::Applied(_)))
        .count();
    assert_eq!(applied, 1, "exactly one delivery must win");

    let author = store.author("author-1").await.unwrap().unwrap();
    assert_eq!(author.revenue, Balance::new(dec!(700.0)));
    assert_eq!(author.sales, 1);
    assert_eq!(
        store.platform().await.unwrap().revenue,
        Balance::new(dec!(300.0))
    );
}

#[tokio::test]
async fn test_racing_approved_and_declined_callbacks() {
    let store = InMemoryStore::new();
    seed_sale(&store, "tx1", "author-1", dec!(1000)).await;
    let engine = Arc::new(engine_over(&store));

    let approved = tokio::spawn({
        let engine = engine.clone();
        async move { engine.settle("tx1", Disposition::Approved).await.unwrap() }
    });
    let declined = tokio::spawn({
        let engine = engine.clone();
        async move { engine.settle("tx1", Disposition::Declined).await.unwrap() }
    });
    let outcomes = [approved.await.unwrap(), declined.await.unwrap()];

    // Whichever disposition won, the ledger matches the final sale status
    // and the loser changed nothing.
    let sale = store.get("tx1").await.unwrap().unwrap();
    let credited = store.author("author-1").await.unwrap().is_some();
    match sale.status {
        librepay::domain::sale::SaleStatus::Success => assert!(credited),
        librepay::domain::sale::SaleStatus::Failed => assert!(!credited),
        librepay::domain::sale::SaleStatus::Pending => panic!("sale must be finalized"),
    }
    assert_eq!(
        outcomes
            .iter()
            .filter(|outcome| matches!(outcome, SettlementOutcome::Applied(_)))
            .count(),
        1
    );
}
