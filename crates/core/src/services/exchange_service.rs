use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::exchange::ExchangeRate;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::settings::Settings;
use crate::models::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::providers::traits::MarketDataProvider;
use crate::services::portfolio_store::PortfolioStore;

/// Decimal places on the received side of a quote.
pub const QUOTE_DECIMALS: u32 = 6;

/// Quotes and executes currency exchanges against the ledger.
///
/// Execution records a `Pending` transaction, waits out the simulated
/// settlement time, then marks it `Completed` in the ledger. Appends go
/// through [`PortfolioStore::append_transaction`], so any number of
/// exchanges may run concurrently.
pub struct ExchangeService {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<PortfolioStore>,
    home_currency: String,
    processing: Duration,
}

impl ExchangeService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<PortfolioStore>,
        settings: &Settings,
    ) -> Self {
        Self {
            provider,
            store,
            home_currency: settings.home_currency.to_uppercase(),
            processing: settings.exchange_processing(),
        }
    }

    /// Quote for `from → to`. Unknown pairs come back as a 1:1 identity rate.
    pub async fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> ExchangeRate {
        self.provider.exchange_rate(from_currency, to_currency).await
    }

    /// Parse a user-entered amount. Must be a plain decimal greater than zero.
    pub fn parse_amount(input: &str) -> Result<Decimal, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidAmount("amount is empty".into()));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|e| CoreError::InvalidAmount(format!("'{trimmed}': {e}")))?;
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "'{trimmed}': must be greater than zero"
            )));
        }
        Ok(amount)
    }

    /// Amount received for `input` units at `rate`, rounded half-up to
    /// [`QUOTE_DECIMALS`] places.
    pub fn quote(input: &str, rate: &ExchangeRate) -> Result<Decimal, CoreError> {
        let amount = Self::parse_amount(input)?;
        let received = amount.checked_mul(rate.rate).ok_or_else(|| {
            CoreError::Arithmetic(format!("{amount} × {} overflows", rate.rate))
        })?;
        Ok(received.round_dp_with_strategy(QUOTE_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Reject `amount` if it exceeds what the portfolio holds of `currency`.
    /// A currency with no holding has a zero balance.
    pub fn check_balance(
        amount: Decimal,
        currency: &str,
        snapshot: &PortfolioSnapshot,
    ) -> Result<(), CoreError> {
        let balance = snapshot
            .holding_for(currency)
            .map(|h| h.amount())
            .unwrap_or(Decimal::ZERO);
        if amount > balance {
            return Err(CoreError::ValidationError(format!(
                "Insufficient {} balance: requested {amount}, available {balance}",
                currency.to_uppercase()
            )));
        }
        Ok(())
    }

    /// Execute an exchange of `amount` units of `from_currency` into `to_currency`.
    ///
    /// Fails only on invalid numeric input (unparseable or non-positive
    /// amount, non-positive rate). Returns the completed record.
    pub async fn execute_exchange(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: &str,
        rate: &ExchangeRate,
    ) -> Result<Transaction, CoreError> {
        let amount = Self::parse_amount(amount)?;
        if rate.rate <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "rate {} for {} must be greater than zero",
                rate.rate,
                rate.key()
            )));
        }

        let transaction_type = if from_currency.eq_ignore_ascii_case(&self.home_currency) {
            TransactionType::Buy
        } else {
            TransactionType::Sell
        };
        let asset = self
            .provider
            .find_asset_by_symbol(to_currency)
            .unwrap_or_else(|| {
                Asset::new(
                    to_currency.to_lowercase(),
                    to_currency,
                    to_currency.to_uppercase(),
                    rate.rate,
                    0.0,
                )
            });

        let pending = Transaction::pending(transaction_type, asset, amount, rate.rate);
        info!(
            id = %pending.id,
            kind = %transaction_type,
            from = %from_currency.to_uppercase(),
            to = %to_currency.to_uppercase(),
            amount = %amount,
            "exchange submitted"
        );
        self.store.append_transaction(pending.clone());

        if !self.processing.is_zero() {
            tokio::time::sleep(self.processing).await;
        }

        let completed = self
            .store
            .update_transaction_status(&pending.id, TransactionStatus::Completed)?;
        info!(id = %completed.id, "exchange completed");
        Ok(completed)
    }
}
