use super::money::Balance;
use serde::{Deserialize, Serialize};

/// Fixed key of the platform ledger singleton.
pub const PLATFORM_LEDGER_ID: &str = "global";

/// Cumulative earnings of one author.
///
/// Both fields are monotonically non-decreasing: they are only ever credited,
/// once per successfully settled sale.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AuthorAccount {
    pub author_id: String,
    pub revenue: Balance,
    pub sales: u64,
}

impl AuthorAccount {
    pub fn new(author_id: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            revenue: Balance::ZERO,
            sales: 0,
        }
    }

    /// Credits one settled sale's author share.
    pub fn credit(&mut self, share: Balance) {
        self.revenue += share;
        self.sales += 1;
    }
}

/// Cumulative platform revenue, stored as a single record under
/// [`PLATFORM_LEDGER_ID`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PlatformLedger {
    pub revenue: Balance,
}

impl PlatformLedger {
    pub fn credit(&mut self, share: Balance) {
        self.revenue += share;
    }
}
