pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use errors::CoreError;
use models::{
    asset::Asset,
    chart::{ChartSeries, ChartTimeframe},
    exchange::ExchangeRate,
    portfolio::PortfolioSnapshot,
    settings::Settings,
    transaction::{Transaction, TransactionFilter},
};
use providers::{
    mock_data::MockMarketData,
    random::{shared, SharedRandom, StdRandom},
    traits::{MarketDataProvider, RandomSource},
};
use services::{
    calculation_service,
    exchange_service::ExchangeService,
    format_service::{self, FormatService},
    portfolio_store::{PortfolioStore, Subscription},
    price_simulator::PriceSimulator,
    revaluation_service::{RevaluationHandle, RevaluationLoop},
};

/// Main entry point for the crypto portfolio core.
///
/// One `PortfolioTracker` is the context object for a running app: it owns
/// the settings, the market-data provider, the store, and the random source,
/// and hands them to the services that need them. Create one per process
/// (or per test) instead of relying on global state.
#[must_use]
pub struct PortfolioTracker {
    settings: Settings,
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<PortfolioStore>,
    random: SharedRandom,
    exchange_service: ExchangeService,
    format_service: FormatService,
    price_simulator: PriceSimulator,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.store.snapshot();
        f.debug_struct("PortfolioTracker")
            .field("provider", &self.provider.name())
            .field("holdings", &snapshot.holdings().len())
            .field("total_value", &snapshot.total_value())
            .field("transactions", &self.store.transactions().len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PortfolioTracker {
    /// Tracker over the built-in mock data with default settings.
    pub fn create_new() -> Result<Self, CoreError> {
        Self::with_settings(Settings::default())
    }

    /// Tracker over the built-in mock data with the given settings.
    pub fn with_settings(settings: Settings) -> Result<Self, CoreError> {
        let provider = Arc::new(MockMarketData::with_settings(&settings));
        Self::with_provider(settings, provider, StdRandom::new())
    }

    /// Fully injected constructor: any provider, any random source.
    pub fn with_provider(
        settings: Settings,
        provider: Arc<dyn MarketDataProvider>,
        random: impl RandomSource + 'static,
    ) -> Result<Self, CoreError> {
        let mut settings = settings;
        settings.normalize();
        settings.validate()?;

        let snapshot = provider.seed_portfolio()?;
        let transactions = provider.seed_transactions();
        let store = Arc::new(PortfolioStore::new(snapshot, transactions));

        Ok(Self::build(settings, provider, store, shared(random)))
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Asset catalogue ─────────────────────────────────────────────

    /// Every asset the provider knows about.
    #[must_use]
    pub fn cryptocurrencies(&self) -> Vec<Asset> {
        self.provider.assets()
    }

    /// A single asset by id, if known.
    #[must_use]
    pub fn cryptocurrency(&self, id: &str) -> Option<Asset> {
        self.provider.find_asset(id)
    }

    // ── Portfolio & ledger feeds ────────────────────────────────────

    /// Live portfolio feed: the current snapshot first, then every revaluation.
    pub fn subscribe_portfolio(&self) -> Subscription<PortfolioSnapshot> {
        self.store.subscribe_portfolio()
    }

    /// Live ledger feed, newest transaction first.
    pub fn subscribe_transactions(&self) -> Subscription<Vec<Transaction>> {
        self.store.subscribe_transactions()
    }

    /// The current snapshot.
    #[must_use]
    pub fn portfolio(&self) -> Arc<PortfolioSnapshot> {
        self.store.snapshot()
    }

    /// The current ledger, newest first.
    #[must_use]
    pub fn transactions(&self) -> Arc<Vec<Transaction>> {
        self.store.transactions()
    }

    /// The ledger entries matching `filter`, newest first.
    #[must_use]
    pub fn filtered_transactions(&self, filter: TransactionFilter) -> Vec<Transaction> {
        self.store.filtered_transactions(filter)
    }

    /// Replace the portfolio snapshot wholesale.
    pub fn update_portfolio(&self, snapshot: PortfolioSnapshot) {
        self.store.replace_snapshot(snapshot);
    }

    /// Prepend a transaction to the ledger.
    pub fn add_transaction(&self, transaction: Transaction) {
        self.store.append_transaction(transaction);
    }

    /// Shared handle to the underlying store.
    #[must_use]
    pub fn store(&self) -> Arc<PortfolioStore> {
        Arc::clone(&self.store)
    }

    // ── Revaluation ─────────────────────────────────────────────────

    /// A loop bound to this tracker's store, random source and tick interval.
    pub fn revaluation_loop(&self) -> RevaluationLoop {
        RevaluationLoop::new(
            Arc::clone(&self.store),
            Arc::clone(&self.random),
            self.settings.tick_interval(),
        )
    }

    /// Spawn the periodic revaluation loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start_revaluation(&self) -> RevaluationHandle {
        self.revaluation_loop().spawn()
    }

    /// Run one revaluation tick immediately.
    pub fn revalue_now(&self) -> Result<Arc<PortfolioSnapshot>, CoreError> {
        self.revaluation_loop().tick()
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Simulated price history for an asset.
    /// Returns `CoreError::AssetNotFound` for unknown ids.
    pub async fn get_price_series(
        &self,
        asset_id: &str,
        timeframe: ChartTimeframe,
    ) -> Result<ChartSeries, CoreError> {
        let asset = self.provider.chart_asset(asset_id).await?;
        let mut random = self.random.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self
            .price_simulator
            .generate(&asset, timeframe, Utc::now(), &mut **random))
    }

    // ── Exchange ────────────────────────────────────────────────────

    /// Quote for `from → to`; unknown pairs fall back to a 1:1 identity rate.
    pub async fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> ExchangeRate {
        self.exchange_service
            .get_exchange_rate(from_currency, to_currency)
            .await
    }

    /// Amount of the target currency received for `amount` at `rate`.
    pub fn quote(&self, amount: &str, rate: &ExchangeRate) -> Result<Decimal, CoreError> {
        ExchangeService::quote(amount, rate)
    }

    /// Parse `amount` and check it against the current holding of `currency`.
    /// Returns the parsed amount when it is covered.
    pub fn check_balance(&self, amount: &str, currency: &str) -> Result<Decimal, CoreError> {
        let parsed = ExchangeService::parse_amount(amount)?;
        ExchangeService::check_balance(parsed, currency, &self.store.snapshot())?;
        Ok(parsed)
    }

    /// Execute an exchange and return the completed ledger record.
    pub async fn execute_exchange(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: &str,
        rate: &ExchangeRate,
    ) -> Result<Transaction, CoreError> {
        self.exchange_service
            .execute_exchange(from_currency, to_currency, amount, rate)
            .await
    }

    // ── Formatting & calculations ───────────────────────────────────

    /// Display string for `amount` in `currency`.
    #[must_use]
    pub fn format_value(&self, amount: Decimal, currency: &str) -> String {
        self.format_service.format(amount, currency)
    }

    /// Signed two-decimal percentage, e.g. `+3.20%`.
    #[must_use]
    pub fn format_percentage(percentage: f64) -> String {
        format_service::format_percentage(percentage)
    }

    /// Percent change from `previous` to `current` (0.0 when `previous` is zero).
    #[must_use]
    pub fn percent_change(current: Decimal, previous: Decimal) -> f64 {
        calculation_service::percent_change(current, previous)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(
        settings: Settings,
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<PortfolioStore>,
        random: SharedRandom,
    ) -> Self {
        let exchange_service =
            ExchangeService::new(Arc::clone(&provider), Arc::clone(&store), &settings);
        let format_service = FormatService::new(&settings);

        Self {
            settings,
            provider,
            store,
            random,
            exchange_service,
            format_service,
            price_simulator: PriceSimulator::new(),
        }
    }
}
