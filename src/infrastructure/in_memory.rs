use crate::domain::ledger::{AuthorAccount, PlatformLedger};
use crate::domain::ports::{SaleStore, SettlementStore};
use crate::domain::sale::Sale;
use crate::domain::settlement::{SettlementOutcome, SettlementPlan};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    sales: HashMap<String, Sale>,
    authors: HashMap<String, AuthorAccount>,
    platform: PlatformLedger,
}

/// A thread-safe in-memory store for sales and ledgers.
///
/// All records live behind a single `Arc<RwLock<_>>`, so holding the write
/// guard for the duration of [`SettlementStore::apply`] gives the settlement
/// its atomic, isolated unit. Ideal for tests and local development.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaleStore for InMemoryStore {
    async fn insert(&self, sale: Sale) -> Result<()> {
        let mut state = self.state.write().await;
        state.sales.insert(sale.id.clone(), sale);
        Ok(())
    }

    async fn get(&self, sale_id: &str) -> Result<Option<Sale>> {
        let state = self.state.read().await;
        Ok(state.sales.get(sale_id).cloned())
    }
}

#[async_trait]
impl SettlementStore for InMemoryStore {
    async fn apply(&self, plan: SettlementPlan) -> Result<SettlementOutcome> {
        // The write guard spans the whole read-modify-write, so concurrent
        // callbacks for the same sale serialize here.
        let mut state = self.state.write().await;

        let sale = state
            .sales
            .get_mut(&plan.sale_id)
            .ok_or_else(|| PaymentError::SaleNotFound(plan.sale_id.clone()))?;

        if !sale.finalize(plan.status, plan.settled_at) {
            return Ok(SettlementOutcome::AlreadySettled(sale.status));
        }
        let status = sale.status;

        if let Some(credit) = plan.credit {
            let author = state
                .authors
                .entry(credit.author_id.clone())
                .or_insert_with(|| AuthorAccount::new(credit.author_id.clone()));
            author.credit(credit.split.author);
            state.platform.credit(credit.split.platform);
        }

        Ok(SettlementOutcome::Applied(status))
    }

    async fn author(&self, author_id: &str) -> Result<Option<AuthorAccount>> {
        let state = self.state.read().await;
        Ok(state.authors.get(author_id).cloned())
    }

    async fn platform(&self) -> Result<PlatformLedger> {
        let state = self.state.read().await;
        Ok(state.platform.clone())
    }
}
