use crate::domain::ports::{SaleStoreBox, SettlementStoreBox};
use crate::domain::settlement::{Disposition, SettlementOutcome, SettlementPlan};
use crate::error::{PaymentError, Result};
use chrono::Utc;

/// Finalizes sales from provider callbacks and distributes revenue.
///
/// The engine reads the sale, derives a [`SettlementPlan`] from its immutable
/// fields, and hands the plan to the settlement store, which commits it as one
/// atomic unit guarded on the sale still being pending. Re-delivered
/// callbacks therefore settle at most once.
pub struct SettlementEngine {
    sales: SaleStoreBox,
    ledger: SettlementStoreBox,
}

impl SettlementEngine {
    pub fn new(sales: SaleStoreBox, ledger: SettlementStoreBox) -> Self {
        Self { sales, ledger }
    }

    /// Settles one sale according to the provider's verdict.
    ///
    /// Fails with [`PaymentError::SaleNotFound`] for an unknown transaction
    /// id without creating any record.
    pub async fn settle(
        &self,
        sale_id: &str,
        disposition: Disposition,
    ) -> Result<SettlementOutcome> {
        let sale = self
            .sales
            .get(sale_id)
            .await?
            .ok_or_else(|| PaymentError::SaleNotFound(sale_id.to_string()))?;

        let plan = SettlementPlan::for_sale(&sale, disposition, Utc::now());
        let outcome = self.ledger.apply(plan).await?;

        match outcome {
            SettlementOutcome::Applied(status) => {
                tracing::info!(sale_id, status = ?status, "sale settled");
            }
            SettlementOutcome::AlreadySettled(status) => {
                tracing::warn!(sale_id, status = ?status, "duplicate callback ignored");
            }
        }

        Ok(outcome)
    }
}
