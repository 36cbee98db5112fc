use super::money::{Amount, Balance};
use super::sale::{Sale, SaleStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fraction of a sale credited to the author.
pub const AUTHOR_SHARE: Decimal = dec!(0.70);
/// Fraction of a sale credited to the platform.
pub const PLATFORM_SHARE: Decimal = dec!(0.30);

/// The two fixed-ratio portions of a sale amount.
///
/// Invariant: `author + platform` equals the original amount exactly, since
/// the shares sum to 1 and decimal multiplication is exact here.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RevenueSplit {
    pub author: Balance,
    pub platform: Balance,
}

impl RevenueSplit {
    pub fn of(amount: Amount) -> Self {
        Self {
            author: Balance::new(amount.value() * AUTHOR_SHARE),
            platform: Balance::new(amount.value() * PLATFORM_SHARE),
        }
    }
}

/// The provider's verdict on a transaction, reduced to the two paths the
/// settlement distinguishes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Disposition {
    Approved,
    Declined,
}

impl Disposition {
    /// The provider signals success with the literal status `approved`;
    /// every other value (canceled, declined, expired, ...) fails the sale.
    pub fn from_provider_status(status: &str) -> Self {
        if status == "approved" {
            Self::Approved
        } else {
            Self::Declined
        }
    }
}

/// Ledger credit owed for one approved sale.
#[derive(Debug, PartialEq, Clone)]
pub struct Credit {
    pub author_id: String,
    pub split: RevenueSplit,
}

/// Everything a store needs to finalize one sale in a single atomic unit.
///
/// The plan is computed from the immutable parts of the sale (amount, author)
/// before the unit runs; the pending-status guard and the ledger
/// read-modify-write happen inside the unit.
#[derive(Debug, PartialEq, Clone)]
pub struct SettlementPlan {
    pub sale_id: String,
    pub status: SaleStatus,
    pub settled_at: DateTime<Utc>,
    pub credit: Option<Credit>,
}

impl SettlementPlan {
    pub fn for_sale(sale: &Sale, disposition: Disposition, at: DateTime<Utc>) -> Self {
        match disposition {
            Disposition::Approved => Self {
                sale_id: sale.id.clone(),
                status: SaleStatus::Success,
                settled_at: at,
                credit: Some(Credit {
                    author_id: sale.author_id.clone(),
                    split: RevenueSplit::of(sale.amount),
                }),
            },
            Disposition::Declined => Self {
                sale_id: sale.id.clone(),
                status: SaleStatus::Failed,
                settled_at: at,
                credit: None,
            },
        }
    }
}

/// Result of handing a [`SettlementPlan`] to the store.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SettlementOutcome {
    /// The plan committed and the sale reached the given terminal status.
    Applied(SaleStatus),
    /// The sale had already been finalized earlier; nothing was written.
    AlreadySettled(SaleStatus),
}
