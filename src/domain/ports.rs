use super::ledger::{AuthorAccount, PlatformLedger};
use super::money::Amount;
use super::sale::Sale;
use super::settlement::{SettlementOutcome, SettlementPlan};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn insert(&self, sale: Sale) -> Result<()>;
    async fn get(&self, sale_id: &str) -> Result<Option<Sale>>;
}

#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Applies the plan if the sale is still pending.
    ///
    /// All writes of one plan (sale status, author account, platform ledger)
    /// commit as a single unit or not at all. The pending-status guard runs
    /// inside that unit, so a concurrent or repeated delivery for the same
    /// sale settles at most once.
    async fn apply(&self, plan: SettlementPlan) -> Result<SettlementOutcome>;

    async fn author(&self, author_id: &str) -> Result<Option<AuthorAccount>>;
    async fn platform(&self) -> Result<PlatformLedger>;
}

/// Mint request sent to the external payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct MintRequest {
    pub amount: Amount,
    pub description: String,
    pub callback_url: String,
}

/// Provider-issued transaction handle.
#[derive(Debug, Clone, PartialEq)]
pub struct MintedTransaction {
    pub id: String,
    pub payment_url: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_transaction(&self, mint: MintRequest) -> Result<MintedTransaction>;
}

pub type SaleStoreBox = Box<dyn SaleStore>;
pub type SettlementStoreBox = Box<dyn SettlementStore>;
pub type PaymentProviderBox = Box<dyn PaymentProvider>;
