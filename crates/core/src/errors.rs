use thiserror::Error;

use crate::models::transaction::TransactionStatus;

/// Unified error type for the entire crypto-portfolio-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input validation ────────────────────────────────────────────
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Lookups ─────────────────────────────────────────────────────
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Transaction {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        id: String,
        from: TransactionStatus,
        to: TransactionStatus,
    },

    // ── Numerics ────────────────────────────────────────────────────
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    // ── Serialization (settings / snapshots) ────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Runtime ─────────────────────────────────────────────────────
    #[error("Portfolio store is no longer publishing")]
    ChannelClosed,
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<rust_decimal::Error> for CoreError {
    fn from(e: rust_decimal::Error) -> Self {
        CoreError::InvalidAmount(e.to_string())
    }
}
