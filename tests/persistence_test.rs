#![cfg(feature = "storage-rocksdb")]

//! Durability tests for the RocksDB store: settled state must survive a
//! reopen, and the replay guard must hold across restarts.

use chrono::Utc;
use librepay::domain::money::Balance;
use librepay::domain::ports::{SaleStore, SettlementStore};
use librepay::domain::sale::{Sale, SaleStatus};
use librepay::domain::settlement::{Disposition, SettlementOutcome, SettlementPlan};
use librepay::infrastructure::rocksdb::RocksDBStore;
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[tokio::test]
async fn test_settled_state_survives_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: settle an approved sale.
    {
        let store = RocksDBStore::open(&db_path).unwrap();
        let sale = Sale::pending(
            "tx1",
            "book-1",
            "author-1",
            dec!(1000).try_into().unwrap(),
            Utc::now(),
        );
        store.insert(sale.clone()).await.unwrap();

        let plan = SettlementPlan::for_sale(&sale, Disposition::Approved, Utc::now());
        let outcome = store.apply(plan).await.unwrap();
        assert_eq!(outcome, SettlementOutcome::Applied(SaleStatus::Success));
    }

    // 2. Second run: reopen the same DB path and verify everything.
    let store = RocksDBStore::open(&db_path).unwrap();

    let sale = store.get("tx1").await.unwrap().unwrap();
    assert_eq!(sale.status, SaleStatus::Success);
    assert!(sale.updated_at.is_some());

    let author = store.author("author-1").await.unwrap().unwrap();
    assert_eq!(author.revenue, Balance::new(dec!(700.0)));
    assert_eq!(author.sales, 1);
    assert_eq!(
        store.platform().await.unwrap().revenue,
        Balance::new(dec!(300.0))
    );

    // 3. A redelivered callback after the restart still settles nothing.
    let plan = SettlementPlan::for_sale(&sale, Disposition::Approved, Utc::now());
    let outcome = store.apply(plan).await.unwrap();
    assert_eq!(
        outcome,
        SettlementOutcome::AlreadySettled(SaleStatus::Success)
    );
    assert_eq!(store.author("author-1").await.unwrap().unwrap().sales, 1);
}
