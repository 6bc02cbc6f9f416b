use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Type of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Buy,
    Sell,
    Send,
    Receive,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "Buy"),
            TransactionType::Sell => write!(f, "Sell"),
            TransactionType::Send => write!(f, "Send"),
            TransactionType::Receive => write!(f, "Receive"),
        }
    }
}

/// Settlement status. The only legal moves are `Pending → Completed`
/// and `Pending → Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    /// Whether a transaction in this status may move to `next`.
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Completed)
                | (TransactionStatus::Pending, TransactionStatus::Failed)
        )
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "Pending"),
            TransactionStatus::Completed => write!(f, "Completed"),
            TransactionStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Ledger view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionFilter {
    #[default]
    All,
    /// Outgoing: `Send` and `Sell`.
    Sent,
    /// Incoming: `Receive` and `Buy`.
    Received,
    Buy,
    Sell,
}

impl TransactionFilter {
    pub const ALL: [TransactionFilter; 5] = [
        TransactionFilter::All,
        TransactionFilter::Sent,
        TransactionFilter::Received,
        TransactionFilter::Buy,
        TransactionFilter::Sell,
    ];

    pub fn matches(self, transaction: &Transaction) -> bool {
        let kind = transaction.transaction_type;
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Sent => {
                matches!(kind, TransactionType::Send | TransactionType::Sell)
            }
            TransactionFilter::Received => {
                matches!(kind, TransactionType::Receive | TransactionType::Buy)
            }
            TransactionFilter::Buy => kind == TransactionType::Buy,
            TransactionFilter::Sell => kind == TransactionType::Sell,
        }
    }
}

impl std::fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionFilter::All => write!(f, "All"),
            TransactionFilter::Sent => write!(f, "Sent"),
            TransactionFilter::Received => write!(f, "Received"),
            TransactionFilter::Buy => write!(f, "Buy"),
            TransactionFilter::Sell => write!(f, "Sell"),
        }
    }
}

/// A single ledger record. Immutable apart from its status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier (e.g., "txn_001" for seeded rows, "txn_<uuid>" for new ones)
    pub id: String,

    pub transaction_type: TransactionType,

    /// The asset involved, as priced when the transaction was created
    pub asset: Asset,

    /// Quantity moved
    pub amount: Decimal,

    /// Unit price at creation
    pub price: Decimal,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    pub status: TransactionStatus,
}

impl Transaction {
    /// Create a new pending transaction with a fresh unique id, stamped now.
    pub fn pending(
        transaction_type: TransactionType,
        asset: Asset,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id: format!("txn_{}", uuid::Uuid::new_v4().simple()),
            transaction_type,
            asset,
            amount,
            price,
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
        }
    }

    /// Copy of this record carrying a new status.
    #[must_use]
    pub fn with_status(&self, status: TransactionStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
