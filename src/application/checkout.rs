use crate::domain::money::Amount;
use crate::domain::ports::{MintRequest, PaymentProviderBox, SaleStoreBox};
use crate::domain::sale::Sale;
use crate::error::Result;
use chrono::Utc;
use rust_decimal::Decimal;

/// A purchase request as received from the storefront.
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    pub book: String,
    pub author_id: String,
    pub amount: Decimal,
}

/// Creates payment intents: mints a transaction with the provider and records
/// the matching pending sale.
///
/// Each call mints a distinct provider transaction; duplicate purchase
/// requests are not deduplicated.
pub struct CheckoutService {
    provider: PaymentProviderBox,
    sales: SaleStoreBox,
    callback_url: String,
}

impl CheckoutService {
    pub fn new(
        provider: PaymentProviderBox,
        sales: SaleStoreBox,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            sales,
            callback_url: callback_url.into(),
        }
    }

    /// Mints a provider transaction for the order and persists the pending
    /// sale under the provider-issued id.
    ///
    /// The sale is only written after the provider call succeeds, so a
    /// provider failure leaves no partial record behind.
    pub async fn create_checkout(&self, order: CheckoutOrder) -> Result<String> {
        let amount: Amount = order.amount.try_into()?;

        let minted = self
            .provider
            .create_transaction(MintRequest {
                amount,
                description: format!("Achat du livre: {}", order.book),
                callback_url: self.callback_url.clone(),
            })
            .await?;

        tracing::debug!(sale_id = %minted.id, book = %order.book, "transaction minted");

        let sale = Sale::pending(minted.id, order.book, order.author_id, amount, Utc::now());
        self.sales.insert(sale).await?;

        Ok(minted.payment_url)
    }
}
