use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::settings::Settings;

/// Decimal places used for crypto amounts.
pub const CRYPTO_DECIMALS: u32 = 6;

/// Decimal places shown on percentages.
pub const PERCENT_DECIMALS: u32 = 2;

/// Renders amounts for display.
///
/// - Home currency: symbol prefix + magnitude abbreviation (`₹12.00M`).
/// - Known crypto codes: six fixed decimals + code (`0.002100 BTC`).
/// - Anything else: magnitude abbreviation + code (`1.50K USD`).
#[derive(Debug, Clone)]
pub struct FormatService {
    home_currency: String,
    home_currency_symbol: String,
    crypto_codes: Vec<String>,
}

impl FormatService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            home_currency: settings.home_currency.to_uppercase(),
            home_currency_symbol: settings.home_currency_symbol.clone(),
            crypto_codes: settings
                .crypto_codes
                .iter()
                .map(|c| c.to_uppercase())
                .collect(),
        }
    }

    pub fn format(&self, amount: Decimal, currency: &str) -> String {
        let code = currency.trim().to_uppercase();
        if code == self.home_currency {
            format!("{}{}", self.home_currency_symbol, abbreviate(amount))
        } else if self.crypto_codes.contains(&code) {
            format!("{} {code}", format_crypto(amount))
        } else {
            format!("{} {code}", abbreviate(amount))
        }
    }
}

impl Default for FormatService {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

/// Magnitude abbreviation. Thresholds and suffixes are part of the display contract:
///
/// | amount          | unit      | decimals | suffix |
/// |-----------------|-----------|----------|--------|
/// | ≥ 10,000,000    | 1,000,000 | 2        | M      |
/// | ≥ 100,000       | 100,000   | 1        | L      |
/// | ≥ 1,000         | 1,000     | 2        | K      |
/// | otherwise       | 1         | 2        |        |
pub fn abbreviate(amount: Decimal) -> String {
    if amount >= dec!(10000000) {
        format!("{}M", fixed(amount / dec!(1000000), 2))
    } else if amount >= dec!(100000) {
        format!("{}L", fixed(amount / dec!(100000), 1))
    } else if amount >= dec!(1000) {
        format!("{}K", fixed(amount / dec!(1000), 2))
    } else {
        fixed(amount, 2)
    }
}

/// Fixed six-decimal rendering used for crypto quantities.
pub fn format_crypto(amount: Decimal) -> String {
    fixed(amount, CRYPTO_DECIMALS)
}

/// Signed percentage with two decimals: `+3.20%`, `-1.80%`.
/// Zero and positive values carry an explicit `+`.
pub fn format_percentage(percentage: f64) -> String {
    let sign = if percentage >= 0.0 { "+" } else { "" };
    let body = match Decimal::from_f64(percentage) {
        Some(value) => fixed(value, PERCENT_DECIMALS),
        None => format!("{percentage:.2}"),
    };
    format!("{sign}{body}%")
}

/// Round half-up (ties away from zero) and pad to exactly `decimals` places.
fn fixed(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}
