use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::transaction::{Transaction, TransactionFilter, TransactionStatus};

/// Single source of truth for the current portfolio snapshot and the ledger.
///
/// Both values live behind `tokio::sync::watch` channels holding an `Arc`:
/// - a write swaps the whole `Arc`, so readers never see a half-updated snapshot;
/// - a new subscriber immediately sees the latest value (replay-latest);
/// - slow subscribers skip intermediate values instead of queueing them.
///
/// Ledger writes go through `send_modify` / `send_if_modified`, which hold the
/// channel's write lock, so concurrent appends are serialized.
pub struct PortfolioStore {
    snapshot_tx: watch::Sender<Arc<PortfolioSnapshot>>,
    ledger_tx: watch::Sender<Arc<Vec<Transaction>>>,
}

impl PortfolioStore {
    /// Seed the store. `transactions` may be in any order; they are stored newest-first.
    pub fn new(snapshot: PortfolioSnapshot, mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let (snapshot_tx, _) = watch::channel(Arc::new(snapshot));
        let (ledger_tx, _) = watch::channel(Arc::new(transactions));
        Self {
            snapshot_tx,
            ledger_tx,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// The current snapshot, without subscribing.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PortfolioSnapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    /// The current ledger (newest first), without subscribing.
    #[must_use]
    pub fn transactions(&self) -> Arc<Vec<Transaction>> {
        Arc::clone(&self.ledger_tx.borrow())
    }

    /// Feed of snapshots: the current one first, then every later update.
    pub fn subscribe_portfolio(&self) -> Subscription<PortfolioSnapshot> {
        Subscription::new(self.snapshot_tx.subscribe())
    }

    /// Feed of the newest-first ledger, with the same replay-latest semantics.
    pub fn subscribe_transactions(&self) -> Subscription<Vec<Transaction>> {
        Subscription::new(self.ledger_tx.subscribe())
    }

    /// Number of live portfolio subscriptions.
    pub fn portfolio_subscriber_count(&self) -> usize {
        self.snapshot_tx.receiver_count()
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Atomically overwrite the snapshot and notify subscribers.
    pub fn replace_snapshot(&self, snapshot: PortfolioSnapshot) {
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }

    /// Read-modify-write of the whole snapshot under the channel's write lock.
    ///
    /// `update` returns `None` to leave the snapshot untouched (no notification).
    /// Returns the snapshot that was published, if any.
    pub fn update_snapshot<F>(&self, update: F) -> Option<Arc<PortfolioSnapshot>>
    where
        F: FnOnce(&PortfolioSnapshot) -> Option<PortfolioSnapshot>,
    {
        let mut published = None;
        self.snapshot_tx.send_if_modified(|current| match update(current) {
            Some(next) => {
                let next = Arc::new(next);
                *current = Arc::clone(&next);
                published = Some(next);
                true
            }
            None => false,
        });
        published
    }

    /// Insert a transaction at its timestamp position, keeping the ledger
    /// newest-first. Ties go ahead of existing entries.
    pub fn append_transaction(&self, transaction: Transaction) {
        debug!(id = %transaction.id, "appending transaction");
        self.ledger_tx.send_modify(|ledger| {
            let pos = ledger.partition_point(|t| t.timestamp > transaction.timestamp);
            Arc::make_mut(ledger).insert(pos, transaction);
        });
    }

    /// The ledger entries matching `filter`, newest first.
    #[must_use]
    pub fn filtered_transactions(&self, filter: TransactionFilter) -> Vec<Transaction> {
        self.ledger_tx
            .borrow()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Move a ledger entry to `status`. Only `Pending → Completed | Failed` is allowed.
    /// Returns the updated record.
    pub fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> Result<Transaction, CoreError> {
        let mut outcome = Err(CoreError::TransactionNotFound(id.to_string()));
        self.ledger_tx.send_if_modified(|ledger| {
            let Some(pos) = ledger.iter().position(|t| t.id == id) else {
                return false;
            };
            let current = ledger[pos].status;
            if !current.can_transition_to(status) {
                outcome = Err(CoreError::InvalidStatusTransition {
                    id: id.to_string(),
                    from: current,
                    to: status,
                });
                return false;
            }
            let updated = ledger[pos].with_status(status);
            Arc::make_mut(ledger)[pos] = updated.clone();
            outcome = Ok(updated);
            true
        });
        outcome
    }
}

/// A live view onto one of the store's feeds.
///
/// The first [`next`](Subscription::next) resolves immediately with the value
/// current at subscription time; later calls wait for the next publish.
/// Dropping the subscription unsubscribes it without affecting any other subscriber.
pub struct Subscription<T> {
    rx: watch::Receiver<Arc<T>>,
    replayed: bool,
}

impl<T> Subscription<T> {
    fn new(rx: watch::Receiver<Arc<T>>) -> Self {
        Self {
            rx,
            replayed: false,
        }
    }

    /// Next value, or `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<Arc<T>> {
        if !self.replayed {
            self.replayed = true;
            return Some(Arc::clone(&self.rx.borrow_and_update()));
        }
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }

    /// Like [`next`](Subscription::next), but reports a dropped store as an error.
    pub async fn recv(&mut self) -> Result<Arc<T>, CoreError> {
        self.next().await.ok_or(CoreError::ChannelClosed)
    }

    /// Most recent value, without waiting and without consuming the update.
    #[must_use]
    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.rx.borrow())
    }

    /// Whether a value newer than the last one returned by `next` is available.
    pub fn has_update(&self) -> bool {
        !self.replayed || self.rx.has_changed().unwrap_or(false)
    }
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            replayed: self.replayed,
        }
    }
}
