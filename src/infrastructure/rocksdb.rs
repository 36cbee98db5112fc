use crate::domain::ledger::{AuthorAccount, PlatformLedger, PLATFORM_LEDGER_ID};
use crate::domain::ports::{SaleStore, SettlementStore};
use crate::domain::sale::Sale;
use crate::domain::settlement::{SettlementOutcome, SettlementPlan};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for sale records, keyed by provider transaction id.
pub const CF_SALES: &str = "sales";
/// Column Family for author accounts, keyed by author id.
pub const CF_AUTHORS: &str = "authors";
/// Column Family holding the platform ledger singleton.
pub const CF_LEDGER: &str = "ledger";

/// A persistent store implementation using RocksDB.
///
/// Each record kind lives in its own Column Family with JSON-encoded values.
/// A settlement commits through a single `WriteBatch`, which RocksDB applies
/// atomically; the read-modify-write around it is serialized behind
/// `settle_lock` so concurrent callbacks cannot interleave inside the unit.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    settle_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_SALES, Options::default()),
            ColumnFamilyDescriptor::new(CF_AUTHORS, Options::default()),
            ColumnFamilyDescriptor::new(CF_LEDGER, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self {
            db: Arc::new(db),
            settle_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::Store(format!("column family {name} not found")))
    }

    fn load_sale(&self, sale_id: &str) -> Result<Option<Sale>> {
        let cf = self.cf(CF_SALES)?;
        match self.db.get_cf(cf, sale_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn load_author(&self, author_id: &str) -> Result<Option<AuthorAccount>> {
        let cf = self.cf(CF_AUTHORS)?;
        match self.db.get_cf(cf, author_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn load_platform(&self) -> Result<PlatformLedger> {
        let cf = self.cf(CF_LEDGER)?;
        match self.db.get_cf(cf, PLATFORM_LEDGER_ID.as_bytes())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(PlatformLedger::default()),
        }
    }
}

#[async_trait]
impl SaleStore for RocksDBStore {
    async fn insert(&self, sale: Sale) -> Result<()> {
        let cf = self.cf(CF_SALES)?;
        let value = serde_json::to_vec(&sale)?;
        self.db.put_cf(cf, sale.id.as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, sale_id: &str) -> Result<Option<Sale>> {
        self.load_sale(sale_id)
    }
}

#[async_trait]
impl SettlementStore for RocksDBStore {
    async fn apply(&self, plan: SettlementPlan) -> Result<SettlementOutcome> {
        let _commit = self.settle_lock.lock().await;

        let mut sale = self
            .load_sale(&plan.sale_id)?
            .ok_or_else(|| PaymentError::SaleNotFound(plan.sale_id.clone()))?;

        if !sale.finalize(plan.status, plan.settled_at) {
            return Ok(SettlementOutcome::AlreadySettled(sale.status));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_SALES)?, sale.id.as_bytes(), serde_json::to_vec(&sale)?);

        if let Some(credit) = plan.credit {
            let mut author = self
                .load_author(&credit.author_id)?
                .unwrap_or_else(|| AuthorAccount::new(credit.author_id.clone()));
            author.credit(credit.split.author);
            batch.put_cf(
                self.cf(CF_AUTHORS)?,
                author.author_id.as_bytes(),
                serde_json::to_vec(&author)?,
            );

            let mut platform = self.load_platform()?;
            platform.credit(credit.split.platform);
            batch.put_cf(
                self.cf(CF_LEDGER)?,
                PLATFORM_LEDGER_ID.as_bytes(),
                serde_json::to_vec(&platform)?,
            );
        }

        self.db.write(batch)?;
        Ok(SettlementOutcome::Applied(sale.status))
    }

    async fn author(&self, author_id: &str) -> Result<Option<AuthorAccount>> {
        self.load_author(author_id)
    }

    async fn platform(&self) -> Result<PlatformLedger> {
        self.load_platform()
    }
}
