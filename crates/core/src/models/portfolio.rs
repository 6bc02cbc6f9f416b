use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use super::asset::Asset;
use crate::errors::CoreError;

/// A quantity of one asset owned within the portfolio.
///
/// `current_value` is always `amount * asset.current_price`; the only way to
/// build a `Holding` is through [`Holding::new`], which computes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    asset: Asset,
    amount: Decimal,
    current_value: Decimal,
    change_percentage: f64,
}

impl Holding {
    /// Value `amount` units of `asset` at the asset's current price.
    pub fn new(asset: Asset, amount: Decimal, change_percentage: f64) -> Result<Self, CoreError> {
        let current_value = amount.checked_mul(asset.current_price).ok_or_else(|| {
            CoreError::Arithmetic(format!(
                "value of {amount} {} at {} overflows",
                asset.symbol, asset.current_price
            ))
        })?;
        Ok(Self {
            asset,
            amount,
            current_value,
            change_percentage,
        })
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn current_value(&self) -> Decimal {
        self.current_value
    }

    /// Running drift in percentage points; moves in lockstep with the
    /// asset's drift under the revaluation loop, but is tracked separately.
    pub fn change_percentage(&self) -> f64 {
        self.change_percentage
    }
}

/// An immutable, internally consistent view of the portfolio at one instant.
///
/// Invariants (enforced by [`PortfolioSnapshot::from_holdings`]):
/// - `total_value == Σ holding.current_value`
/// - `total_change_percentage` is the unweighted mean of holding change
///   percentages (0.0 for an empty portfolio)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    total_value: Decimal,
    total_change_percentage: f64,
    holdings: Vec<Holding>,
}

impl PortfolioSnapshot {
    /// Build a snapshot, deriving the aggregate fields from `holdings`.
    /// Holding order is preserved.
    pub fn from_holdings(holdings: Vec<Holding>) -> Result<Self, CoreError> {
        let total_value = holdings
            .iter()
            .try_fold(Decimal::ZERO, |acc, h| acc.checked_add(h.current_value))
            .ok_or_else(|| CoreError::Arithmetic("portfolio total overflows".into()))?;

        // Deliberately unweighted: a tiny holding moves the aggregate as much as a large one.
        let total_change_percentage = if holdings.is_empty() {
            0.0
        } else {
            holdings.iter().map(|h| h.change_percentage).sum::<f64>() / holdings.len() as f64
        };

        Ok(Self {
            total_value,
            total_change_percentage,
            holdings,
        })
    }

    /// A snapshot with no holdings and a zero total.
    pub fn empty() -> Self {
        Self {
            total_value: Decimal::ZERO,
            total_change_percentage: 0.0,
            holdings: Vec::new(),
        }
    }

    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    pub fn total_change_percentage(&self) -> f64 {
        self.total_change_percentage
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Find the holding for a symbol (case-insensitive).
    pub fn holding_for(&self, symbol: &str) -> Option<&Holding> {
        let upper = symbol.to_uppercase();
        self.holdings.iter().find(|h| h.asset.symbol == upper)
    }

    /// Held amount per symbol, as offered to the exchange flow.
    pub fn available_balances(&self) -> HashMap<String, Decimal> {
        self.holdings
            .iter()
            .map(|h| (h.asset.symbol.clone(), h.amount))
            .collect()
    }
}

impl Default for PortfolioSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
