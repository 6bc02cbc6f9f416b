use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tradeable asset as seen by the portfolio (crypto or the home fiat currency).
///
/// Assets are immutable snapshots: a price update produces a new `Asset`
/// via [`Asset::repriced`], the old one is simply dropped.
///
/// **Equality and hashing** are based solely on `id`, so two snapshots of
/// the same asset at different prices still compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Stable lookup key (e.g., "bitcoin", "ethereum", "inr")
    pub id: String,

    /// Ticker symbol, uppercased (e.g., "BTC", "ETH", "INR")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Current unit price in the home currency
    pub current_price: Decimal,

    /// Cumulative price drift in percentage points.
    ///
    /// Named after the usual "24h change" column, but the revaluation loop
    /// adds each tick's delta to it, so it is a running drift since seeding
    /// rather than a rolling 24-hour window.
    pub price_change_percentage_24h: f64,

    /// Icon reference for display layers
    pub icon: String,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: Decimal,
        price_change_percentage_24h: f64,
    ) -> Self {
        let id = id.into();
        Self {
            icon: id.clone(),
            id,
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            current_price,
            price_change_percentage_24h,
        }
    }

    /// Builder-style override for the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// A fresh snapshot of this asset at a new price, with `delta_pct`
    /// percentage points added to the drift field.
    #[must_use]
    pub fn repriced(&self, new_price: Decimal, delta_pct: f64) -> Self {
        Self {
            current_price: new_price,
            price_change_percentage_24h: self.price_change_percentage_24h + delta_pct,
            ..self.clone()
        }
    }
}
