use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::exchange::ExchangeRate;
use crate::models::portfolio::{Holding, PortfolioSnapshot};
use crate::models::settings::Settings;
use crate::models::transaction::{Transaction, TransactionStatus, TransactionType};

/// In-memory market data with simulated network latency.
///
/// - **Assets**: Bitcoin, Ethereum, Litecoin and the Indian Rupee.
/// - **Portfolio**: BTC, ETH and an INR cash balance.
/// - **Quotes**: ETH↔INR and BTC→INR; every other pair is quoted 1:1.
///
/// Latencies come from [`Settings`]; zero latency skips the sleep entirely.
pub struct MockMarketData {
    assets: Vec<Asset>,
    exchange_rates: HashMap<String, ExchangeRate>,
    quote_latency: Duration,
    chart_latency: Duration,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        let assets = vec![
            Asset::new("bitcoin", "BTC", "Bitcoin", dec!(76625024), 3.2).with_icon("btc"),
            Asset::new("ethereum", "ETH", "Ethereum", dec!(179102.50), 2.5).with_icon("eth"),
            Asset::new("litecoin", "LTC", "Litecoin", dec!(8500.00), -1.8).with_icon("ltc"),
            Asset::new("inr", "INR", "Indian Rupee", dec!(1.0), 0.0).with_icon("inr"),
        ];

        let rates = [
            ExchangeRate::new("ETH", "INR", dec!(176138.80), 0.2, Some(dec!(422.73))),
            ExchangeRate::new("INR", "ETH", dec!(0.00000568), 0.2, Some(dec!(422.73))),
            ExchangeRate::new("BTC", "INR", dec!(76500000), 0.15, Some(dec!(800.00))),
        ];
        let exchange_rates = rates.into_iter().map(|r| (r.key(), r)).collect();

        Self {
            assets,
            exchange_rates,
            quote_latency: settings.quote_latency(),
            chart_latency: settings.chart_latency(),
        }
    }

    /// Register or replace a quote.
    pub fn insert_rate(&mut self, rate: ExchangeRate) {
        self.exchange_rates.insert(rate.key(), rate);
    }

    /// Synchronous quote lookup, without the simulated latency.
    pub fn lookup_rate(&self, from_currency: &str, to_currency: &str) -> ExchangeRate {
        self.exchange_rates
            .get(&ExchangeRate::pair_key(from_currency, to_currency))
            .cloned()
            .unwrap_or_else(|| ExchangeRate::identity(from_currency, to_currency))
    }

    fn asset(&self, id: &str) -> Result<Asset, CoreError> {
        self.assets
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))
    }
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    fn name(&self) -> &str {
        "MockMarketData"
    }

    fn assets(&self) -> Vec<Asset> {
        self.assets.clone()
    }

    fn seed_portfolio(&self) -> Result<PortfolioSnapshot, CoreError> {
        let holdings = vec![
            Holding::new(self.asset("bitcoin")?, dec!(0.015), 3.2)?,
            Holding::new(self.asset("ethereum")?, dec!(2.640), 2.5)?,
            Holding::new(self.asset("inr")?, dec!(157342.05), 4.6)?,
        ];
        PortfolioSnapshot::from_holdings(holdings)
    }

    fn seed_transactions(&self) -> Vec<Transaction> {
        let now = Utc::now();
        let seeds: [(&str, TransactionType, usize, Decimal, Decimal, i64); 4] = [
            ("txn_001", TransactionType::Receive, 0, dec!(0.002126), dec!(76625024), 1),
            ("txn_002", TransactionType::Send, 1, dec!(0.003126), dec!(179102.50), 2),
            ("txn_003", TransactionType::Send, 2, dec!(0.02126), dec!(8500.00), 3),
            ("txn_004", TransactionType::Receive, 0, dec!(0.001500), dec!(74000.00), 5),
        ];

        seeds
            .into_iter()
            .filter_map(|(id, transaction_type, asset_idx, amount, price, days_ago)| {
                let asset = self.assets.get(asset_idx)?.clone();
                Some(Transaction {
                    id: id.to_string(),
                    transaction_type,
                    asset,
                    amount,
                    price,
                    timestamp: now - ChronoDuration::days(days_ago),
                    status: TransactionStatus::Completed,
                })
            })
            .collect()
    }

    async fn exchange_rate(&self, from_currency: &str, to_currency: &str) -> ExchangeRate {
        simulate_latency(self.quote_latency).await;
        let rate = self.lookup_rate(from_currency, to_currency);
        debug!(pair = %rate.key(), rate = %rate.rate, "quoted exchange rate");
        rate
    }

    async fn chart_asset(&self, asset_id: &str) -> Result<Asset, CoreError> {
        simulate_latency(self.chart_latency).await;
        self.asset(asset_id)
    }
}
