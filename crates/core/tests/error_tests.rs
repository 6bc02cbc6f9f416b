// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use crypto_portfolio_core::errors::CoreError;
use crypto_portfolio_core::models::transaction::TransactionStatus;
use rust_decimal::Decimal;
use std::str::FromStr;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_amount() {
        let err = CoreError::InvalidAmount("'abc': invalid decimal".into());
        assert_eq!(err.to_string(), "Invalid amount: 'abc': invalid decimal");
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("Insufficient ETH balance".into());
        assert_eq!(err.to_string(), "Validation failed: Insufficient ETH balance");
    }

    #[test]
    fn asset_not_found() {
        let err = CoreError::AssetNotFound("dogecoin".into());
        assert_eq!(err.to_string(), "Asset not found: dogecoin");
    }

    #[test]
    fn transaction_not_found() {
        let err = CoreError::TransactionNotFound("txn_999".into());
        assert_eq!(err.to_string(), "Transaction not found: txn_999");
    }

    #[test]
    fn invalid_status_transition() {
        let err = CoreError::InvalidStatusTransition {
            id: "txn_001".into(),
            from: TransactionStatus::Completed,
            to: TransactionStatus::Failed,
        };
        assert_eq!(
            err.to_string(),
            "Transaction txn_001 cannot move from Completed to Failed"
        );
    }

    #[test]
    fn arithmetic() {
        let err = CoreError::Arithmetic("portfolio total overflows".into());
        assert_eq!(err.to_string(), "Arithmetic error: portfolio total overflows");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad".into());
        assert_eq!(err.to_string(), "Serialization error: bad");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn channel_closed() {
        assert_eq!(
            CoreError::ChannelClosed.to_string(),
            "Portfolio store is no longer publishing"
        );
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_decimal_error() {
        let dec_err = Decimal::from_str("12abc").unwrap_err();
        let err: CoreError = dec_err.into();
        assert!(matches!(err, CoreError::InvalidAmount(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn parse(input: &str) -> Result<Decimal, CoreError> {
            Ok(Decimal::from_str(input)?)
        }
        assert!(parse("1.5").is_ok());
        assert!(matches!(parse("x"), Err(CoreError::InvalidAmount(_))));
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

#[test]
fn core_error_is_send_sync_and_std_error() {
    fn assert_bounds<T: std::error::Error + Send + Sync + 'static>() {}
    assert_bounds::<CoreError>();
}
