use super::money::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Success,
    Failed,
}

impl SaleStatus {
    /// `Success` and `Failed` are terminal; a finalized sale never changes again.
    pub fn is_final(&self) -> bool {
        !matches!(self, SaleStatus::Pending)
    }
}

/// Persisted record of one purchase attempt, keyed by the provider-issued
/// transaction id.
///
/// Created as `Pending` when the checkout mints the provider transaction, and
/// finalized exactly once by the settlement when the provider's callback
/// arrives.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Sale {
    /// Provider transaction id. Assigned by the provider, immutable.
    pub id: String,
    /// Reference to the purchased book.
    pub book: String,
    /// The author credited on a successful settlement.
    pub author_id: String,
    /// Gross sale amount.
    pub amount: Amount,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    /// Absent until the first (and only) status transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Sale {
    pub fn pending(
        id: impl Into<String>,
        book: impl Into<String>,
        author_id: impl Into<String>,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            book: book.into(),
            author_id: author_id.into(),
            amount,
            status: SaleStatus::Pending,
            created_at: at,
            updated_at: None,
        }
    }

    /// Applies a terminal status.
    ///
    /// Returns `false` without touching the record if the sale has already
    /// been finalized. Callers must only commit the record when this
    /// returns `true`.
    pub fn finalize(&mut self, status: SaleStatus, at: DateTime<Utc>) -> bool {
        debug_assert!(status.is_final());
        if self.status.is_final() {
            return false;
        }
        self.status = status;
        self.updated_at = Some(at);
        true
    }
}
