use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::portfolio::{Holding, PortfolioSnapshot};
use crate::providers::random::SharedRandom;
use crate::providers::traits::RandomSource;
use crate::services::portfolio_store::PortfolioStore;
use crate::services::price_simulator::scale_price;

/// Maximum relative price move per tick (±1%).
pub const PRICE_DRIFT: f64 = 0.01;

/// One revaluation tick over a whole snapshot.
///
/// For each holding, in order:
/// 1. draw `delta` uniformly from `±PRICE_DRIFT`;
/// 2. reprice the asset to `price * (1 + delta)`;
/// 3. add `delta * 100` percentage points to both the asset drift and the
///    holding change (a cumulative drift, not a rolling 24h window);
/// 4. revalue the holding at `amount * new_price`.
///
/// A holding that cannot be revalued is carried over unchanged and logged;
/// it never aborts the tick. The aggregate fields are rebuilt from the
/// resulting holdings.
pub fn revalue_snapshot(
    snapshot: &PortfolioSnapshot,
    random: &mut dyn RandomSource,
) -> Result<PortfolioSnapshot, CoreError> {
    let mut holdings = Vec::with_capacity(snapshot.holdings().len());
    for holding in snapshot.holdings() {
        match revalue_holding(holding, random) {
            Ok(next) => holdings.push(next),
            Err(e) => {
                warn!(
                    asset = %holding.asset().id,
                    symbol = %holding.asset().symbol,
                    error = %e,
                    "skipping holding for this tick"
                );
                holdings.push(holding.clone());
            }
        }
    }
    PortfolioSnapshot::from_holdings(holdings)
}

fn revalue_holding(holding: &Holding, random: &mut dyn RandomSource) -> Result<Holding, CoreError> {
    let asset = holding.asset();
    if asset.id.trim().is_empty() {
        return Err(CoreError::AssetNotFound(format!(
            "holding of {} has no asset id",
            holding.amount()
        )));
    }

    let delta = random.next_symmetric(PRICE_DRIFT);
    let new_price = scale_price(asset.current_price, delta).ok_or_else(|| {
        CoreError::Arithmetic(format!(
            "cannot apply delta {delta} to {} price {}",
            asset.symbol, asset.current_price
        ))
    })?;
    let delta_pct = delta * 100.0;

    Holding::new(
        asset.repriced(new_price, delta_pct),
        holding.amount(),
        holding.change_percentage() + delta_pct,
    )
}

/// Periodic driver that revalues the store's snapshot every `interval`.
///
/// The loop is the only writer of the snapshot; everyone else reads through
/// [`PortfolioStore::subscribe_portfolio`].
pub struct RevaluationLoop {
    store: Arc<PortfolioStore>,
    random: SharedRandom,
    interval: Duration,
}

impl RevaluationLoop {
    pub fn new(store: Arc<PortfolioStore>, random: SharedRandom, interval: Duration) -> Self {
        Self {
            store,
            random,
            interval,
        }
    }

    /// Run a single tick now and publish the result.
    pub fn tick(&self) -> Result<Arc<PortfolioSnapshot>, CoreError> {
        let mut random = self.random.lock().unwrap_or_else(|e| e.into_inner());
        let mut failure = None;
        let published = self
            .store
            .update_snapshot(|current| match revalue_snapshot(current, &mut **random) {
                Ok(next) => Some(next),
                Err(e) => {
                    failure = Some(e);
                    None
                }
            });
        published.ok_or_else(|| {
            failure.unwrap_or_else(|| CoreError::Arithmetic("revaluation produced no snapshot".into()))
        })
    }

    /// Start ticking on the current tokio runtime. The first tick fires one
    /// `interval` after spawning.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(self) -> RevaluationHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval = ?self.interval, "revaluation loop started");

            let mut ticks: u64 = 0;
            loop {
                tokio::select! {
                    // Fires on an explicit stop and when the handle is dropped.
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        ticks += 1;
                        match self.tick() {
                            Ok(snapshot) => debug!(
                                tick = ticks,
                                total_value = %snapshot.total_value(),
                                change_pct = snapshot.total_change_percentage(),
                                "revalued portfolio"
                            ),
                            Err(e) => warn!(tick = ticks, error = %e, "revaluation tick failed"),
                        }
                    }
                }
            }

            info!(ticks, "revaluation loop stopped");
            ticks
        });

        RevaluationHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Owner of a running [`RevaluationLoop`]. Dropping it cancels the loop
/// and releases its timer.
#[must_use = "dropping the handle stops the revaluation loop"]
pub struct RevaluationHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<u64>>,
}

impl RevaluationHandle {
    /// Stop the loop and wait for it to exit. Returns the number of ticks it ran.
    pub async fn stop(mut self) -> u64 {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        match self.task.take() {
            Some(task) => task.await.unwrap_or(0),
            None => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for RevaluationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
