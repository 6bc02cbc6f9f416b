use chrono::{Duration, Utc};
use crypto_portfolio_core::errors::CoreError;
use crypto_portfolio_core::models::asset::Asset;
use crypto_portfolio_core::models::chart::ChartTimeframe;
use crypto_portfolio_core::models::exchange::ExchangeRate;
use crypto_portfolio_core::models::portfolio::{Holding, PortfolioSnapshot};
use crypto_portfolio_core::models::settings::Settings;
use crypto_portfolio_core::models::transaction::{Transaction, TransactionStatus, TransactionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};

fn btc() -> Asset {
    Asset::new("bitcoin", "btc", "Bitcoin", dec!(76625024), 3.2)
}

fn eth() -> Asset {
    Asset::new("ethereum", "ETH", "Ethereum", dec!(179102.50), 2.5)
}

// ═══════════════════════════════════════════════════════════════════
//  Asset
// ═══════════════════════════════════════════════════════════════════

mod asset {
    use super::*;

    #[test]
    fn symbol_is_uppercased() {
        assert_eq!(btc().symbol, "BTC");
    }

    #[test]
    fn icon_defaults_to_id() {
        assert_eq!(btc().icon, "bitcoin");
        assert_eq!(btc().with_icon("btc").icon, "btc");
    }

    #[test]
    fn equality_ignores_price_and_name() {
        let a = btc();
        let mut b = btc();
        b.current_price = dec!(1);
        b.name = "Something else".into();
        assert_eq!(a, b);
        assert_ne!(a, eth());
    }

    #[test]
    fn hash_is_consistent_with_equality() {
        let mut set = HashSet::new();
        set.insert(btc());
        set.insert(btc().repriced(dec!(5), 1.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn repriced_adds_drift_and_keeps_identity() {
        let original = btc();
        let next = original.repriced(dec!(77000000), 0.5);
        assert_eq!(next.current_price, dec!(77000000));
        assert!((next.price_change_percentage_24h - 3.7).abs() < 1e-9);
        assert_eq!(next.id, original.id);
        assert_eq!(next.symbol, original.symbol);
        // original is untouched
        assert_eq!(original.current_price, dec!(76625024));
    }

    #[test]
    fn serde_roundtrip_json() {
        let asset = eth();
        let json = serde_json::to_string(&asset).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.current_price, dec!(179102.50));
        assert_eq!(back.symbol, "ETH");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding & PortfolioSnapshot
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn value_is_amount_times_price() {
        let h = Holding::new(btc(), dec!(0.015), 3.2).unwrap();
        assert_eq!(h.current_value(), dec!(1149375.36));
        assert_eq!(h.current_value(), h.amount() * h.asset().current_price);
    }

    #[test]
    fn zero_amount_has_zero_value() {
        let h = Holding::new(eth(), Decimal::ZERO, 0.0).unwrap();
        assert_eq!(h.current_value(), Decimal::ZERO);
    }

    #[test]
    fn overflow_is_an_arithmetic_error() {
        let asset = Asset::new("huge", "HUGE", "Huge", Decimal::MAX, 0.0);
        let err = Holding::new(asset, dec!(2), 0.0).unwrap_err();
        assert!(matches!(err, CoreError::Arithmetic(_)));
    }
}

mod snapshot {
    use super::*;

    fn sample() -> PortfolioSnapshot {
        PortfolioSnapshot::from_holdings(vec![
            Holding::new(btc(), dec!(0.015), 3.2).unwrap(),
            Holding::new(eth(), dec!(2.640), 2.5).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn total_is_sum_of_holding_values() {
        let s = sample();
        let sum: Decimal = s.holdings().iter().map(|h| h.current_value()).sum();
        assert_eq!(s.total_value(), sum);
        assert_eq!(s.total_value(), dec!(1622205.96));
    }

    #[test]
    fn aggregate_change_is_unweighted_mean() {
        let s = sample();
        assert!((s.total_change_percentage() - 2.85).abs() < 1e-9);
    }

    #[test]
    fn holding_order_is_preserved() {
        let s = sample();
        let symbols: Vec<&str> = s.holdings().iter().map(|h| h.asset().symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }

    #[test]
    fn empty_snapshot_has_zero_aggregates() {
        let s = PortfolioSnapshot::from_holdings(Vec::new()).unwrap();
        assert_eq!(s.total_value(), Decimal::ZERO);
        assert_eq!(s.total_change_percentage(), 0.0);
        assert_eq!(s, PortfolioSnapshot::default());
    }

    #[test]
    fn holding_for_is_case_insensitive() {
        let s = sample();
        assert_eq!(s.holding_for("eth").unwrap().amount(), dec!(2.640));
        assert!(s.holding_for("LTC").is_none());
    }

    #[test]
    fn available_balances_map_symbol_to_amount() {
        let balances = sample().available_balances();
        let expected: HashMap<String, Decimal> =
            [("BTC".to_string(), dec!(0.015)), ("ETH".to_string(), dec!(2.640))]
                .into_iter()
                .collect();
        assert_eq!(balances, expected);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transaction
// ═══════════════════════════════════════════════════════════════════

mod transaction {
    use super::*;

    #[test]
    fn pending_transactions_get_unique_prefixed_ids() {
        let ids: HashSet<String> = (0..100)
            .map(|_| Transaction::pending(TransactionType::Buy, eth(), dec!(1), dec!(2)).id)
            .collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.iter().all(|id| id.starts_with("txn_")));
    }

    #[test]
    fn pending_starts_pending_and_now() {
        let before = Utc::now();
        let tx = Transaction::pending(TransactionType::Sell, btc(), dec!(0.1), dec!(76500000));
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(tx.timestamp >= before);
        assert!(tx.timestamp <= Utc::now() + Duration::seconds(1));
    }

    #[test]
    fn with_status_only_changes_status() {
        let tx = Transaction::pending(TransactionType::Buy, eth(), dec!(1), dec!(2));
        let done = tx.with_status(TransactionStatus::Completed);
        assert_eq!(done.status, TransactionStatus::Completed);
        assert_eq!(done.id, tx.id);
        assert_eq!(done.timestamp, tx.timestamp);
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[test]
    fn only_pending_can_transition() {
        use TransactionStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Completed));
    }

    #[test]
    fn display_names() {
        assert_eq!(TransactionType::Receive.to_string(), "Receive");
        assert_eq!(TransactionType::Send.to_string(), "Send");
        assert_eq!(TransactionStatus::Failed.to_string(), "Failed");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChartTimeframe
// ═══════════════════════════════════════════════════════════════════

mod chart_timeframe {
    use super::*;

    #[test]
    fn point_counts_match_table() {
        let counts: Vec<usize> = ChartTimeframe::ALL.iter().map(|t| t.point_count()).collect();
        assert_eq!(counts, vec![60, 48, 24, 7, 30, 180, 365]);
    }

    #[test]
    fn steps() {
        assert_eq!(ChartTimeframe::Hour1.step(), Duration::minutes(1));
        assert_eq!(ChartTimeframe::Hour8.step(), Duration::minutes(10));
        assert_eq!(ChartTimeframe::Day1.step(), Duration::hours(1));
        assert_eq!(ChartTimeframe::Week1.step(), Duration::days(1));
        assert_eq!(ChartTimeframe::Year1.step(), Duration::days(1));
    }

    #[test]
    fn labels() {
        assert_eq!(ChartTimeframe::Month6.to_string(), "6m");
        assert_eq!(ChartTimeframe::Hour8.label(), "8h");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ExchangeRate
// ═══════════════════════════════════════════════════════════════════

mod exchange_rate {
    use super::*;

    #[test]
    fn pair_key_is_uppercased() {
        assert_eq!(ExchangeRate::pair_key("eth", "inr"), "ETH_INR");
    }

    #[test]
    fn identity_is_one_to_one_without_fees() {
        let r = ExchangeRate::identity("DOGE", "INR");
        assert_eq!(r.rate, Decimal::ONE);
        assert_eq!(r.spread, 0.0);
        assert_eq!(r.gas_fee, None);
        assert_eq!(r.key(), "DOGE_INR");
    }

    #[test]
    fn gas_fee_defaults_to_none_when_absent() {
        let json = r#"{"from_currency":"BTC","to_currency":"INR","rate":"76500000","spread":0.15}"#;
        let r: ExchangeRate = serde_json::from_str(json).unwrap();
        assert_eq!(r.gas_fee, None);
        assert_eq!(r.rate, dec!(76500000));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.home_currency, "INR");
        assert_eq!(s.home_currency_symbol, "₹");
        assert_eq!(s.tick_interval_ms, 3000);
        assert!(s.is_crypto("btc"));
        assert!(!s.is_crypto("USD"));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_and_normalizes() {
        let s = Settings::from_json(r#"{"home_currency":" usd ","crypto_codes":["sol"],"tick_interval_ms":500}"#)
            .unwrap();
        assert_eq!(s.home_currency, "USD");
        assert_eq!(s.crypto_codes, vec!["SOL".to_string()]);
        assert_eq!(s.tick_interval().as_millis(), 500);
        assert_eq!(s.quote_latency_ms, 1000);
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let err = Settings::from_json(r#"{"tick_interval_ms":0}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn bad_home_currency_is_rejected() {
        let err = Settings::from_json(r#"{"home_currency":"RUPEE"}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn json_roundtrip() {
        let s = Settings::default();
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
