use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Conversion terms for an ordered currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,

    /// Units of `to_currency` received per unit of `from_currency`
    pub rate: Decimal,

    /// Spread in percent (e.g., 0.2 for 0.2%)
    pub spread: f64,

    /// Optional network/gas fee, denominated in the home currency
    #[serde(default)]
    pub gas_fee: Option<Decimal>,
}

impl ExchangeRate {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Decimal,
        spread: f64,
        gas_fee: Option<Decimal>,
    ) -> Self {
        Self {
            from_currency: from_currency.into().to_uppercase(),
            to_currency: to_currency.into().to_uppercase(),
            rate,
            spread,
            gas_fee,
        }
    }

    /// 1:1, zero-spread, fee-free rate used for pairs with no configured quote.
    pub fn identity(from_currency: &str, to_currency: &str) -> Self {
        Self::new(from_currency, to_currency, Decimal::ONE, 0.0, None)
    }

    /// Lookup key for a pair, e.g. ("eth", "inr") → "ETH_INR".
    pub fn pair_key(from_currency: &str, to_currency: &str) -> String {
        format!(
            "{}_{}",
            from_currency.to_uppercase(),
            to_currency.to_uppercase()
        )
    }

    pub fn key(&self) -> String {
        Self::pair_key(&self.from_currency, &self.to_currency)
    }
}
