use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::exchange::ExchangeRate;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::transaction::Transaction;

/// Source of reference market data: the asset catalogue, the initial
/// portfolio and ledger, and quote lookups.
///
/// The tracker only talks to this trait, so the in-memory mock can be
/// swapped for a live feed without touching the services.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Every asset this provider knows about.
    fn assets(&self) -> Vec<Asset>;

    /// Look up an asset by its stable id.
    fn find_asset(&self, id: &str) -> Option<Asset> {
        self.assets().into_iter().find(|a| a.id == id)
    }

    /// Look up an asset by ticker symbol (case-insensitive).
    fn find_asset_by_symbol(&self, symbol: &str) -> Option<Asset> {
        let upper = symbol.to_uppercase();
        self.assets().into_iter().find(|a| a.symbol == upper)
    }

    /// Portfolio the tracker starts from.
    fn seed_portfolio(&self) -> Result<PortfolioSnapshot, CoreError>;

    /// Ledger the tracker starts from, in any order.
    fn seed_transactions(&self) -> Vec<Transaction>;

    /// Quote for an ordered pair. Unknown pairs resolve to
    /// [`ExchangeRate::identity`], never to an error.
    async fn exchange_rate(&self, from_currency: &str, to_currency: &str) -> ExchangeRate;

    /// Resolve the asset a chart should be generated for.
    /// Returns `CoreError::AssetNotFound` for unknown ids.
    async fn chart_asset(&self, asset_id: &str) -> Result<Asset, CoreError>;
}

/// Injectable source of uniform randomness.
///
/// Every random draw in the crate goes through this trait so tests can
/// replay exact sequences.
pub trait RandomSource: Send {
    /// Next sample, uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Next sample, uniform in `[-half_width, +half_width)`.
    fn next_symmetric(&mut self, half_width: f64) -> f64 {
        (self.next_unit() - 0.5) * 2.0 * half_width
    }
}
