use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Runtime configuration for the tracker. Every field has a default, so a
/// partial JSON document is enough to override a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The currency all values are denominated and abbreviated in (e.g., "INR").
    pub home_currency: String,

    /// Prefix used when formatting home-currency amounts (e.g., "₹").
    pub home_currency_symbol: String,

    /// Codes rendered as fixed-precision crypto amounts (e.g., "BTC").
    pub crypto_codes: Vec<String>,

    /// Revaluation tick period.
    pub tick_interval_ms: u64,

    /// Simulated latency before an exchange quote is returned.
    pub quote_latency_ms: u64,

    /// Simulated latency before a price series is returned.
    pub chart_latency_ms: u64,

    /// Simulated settlement time between Pending and Completed.
    pub exchange_processing_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_currency: "INR".to_string(),
            home_currency_symbol: "₹".to_string(),
            crypto_codes: vec!["BTC".to_string(), "ETH".to_string(), "LTC".to_string()],
            tick_interval_ms: 3000,
            quote_latency_ms: 1000,
            chart_latency_ms: 800,
            exchange_processing_ms: 2000,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, normalise codes, and validate.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Upper-case and trim every currency code.
    pub fn normalize(&mut self) {
        self.home_currency = self.home_currency.trim().to_uppercase();
        for code in &mut self.crypto_codes {
            *code = code.trim().to_uppercase();
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let home = &self.home_currency;
        if home.len() != 3 || !home.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid home currency '{home}': must be exactly 3 ASCII letters (e.g., INR, USD)"
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(CoreError::ValidationError(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Whether `code` should be rendered as a crypto amount.
    pub fn is_crypto(&self, code: &str) -> bool {
        self.crypto_codes.iter().any(|c| c.eq_ignore_ascii_case(code))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn quote_latency(&self) -> Duration {
        Duration::from_millis(self.quote_latency_ms)
    }

    pub fn chart_latency(&self) -> Duration {
        Duration::from_millis(self.chart_latency_ms)
    }

    pub fn exchange_processing(&self) -> Duration {
        Duration::from_millis(self.exchange_processing_ms)
    }
}
