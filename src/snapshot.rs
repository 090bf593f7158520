//! Published pricing results, swapped atomically per category.
//!
//! Readers take an `Arc` to the current [`Snapshot`] and never observe a
//! partially written pass. Publishing replaces the whole snapshot for its
//! category in one write.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::info;

use crate::domain::{FairMarket, OfferKey};
use crate::engine::{PassOutcome, PassReport};

/// The complete output of one pass for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub category: String,
    pub generated_at: DateTime<Utc>,
    pub markets: Vec<FairMarket>,
    pub report: PassReport,
}

impl Snapshot {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        outcome: PassOutcome,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let category: String = category.into();
        Self {
            category: category_key(&category),
            generated_at,
            markets: outcome.markets,
            report: outcome.report,
        }
    }

    /// Find a market by key. Markets are held in key order.
    #[must_use]
    pub fn market(&self, key: &OfferKey) -> Option<&FairMarket> {
        self.markets
            .binary_search_by(|m| m.key().cmp(key))
            .ok()
            .map(|i| &self.markets[i])
    }
}

/// Categories are keyed trimmed and lower-cased.
fn category_key(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Notification sent when a category's snapshot is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotUpdate {
    pub category: String,
    pub markets: usize,
}

/// Thread-safe store of the latest snapshot per category.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: RwLock<BTreeMap<String, Arc<Snapshot>>>,
    tx: Option<broadcast::Sender<SnapshotUpdate>>,
}

impl SnapshotStore {
    /// Create a store without notifications.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with broadcast notifications.
    #[must_use]
    pub fn with_notifications(capacity: usize) -> (Self, broadcast::Receiver<SnapshotUpdate>) {
        let (tx, rx) = broadcast::channel(capacity);
        let store = Self {
            snapshots: RwLock::new(BTreeMap::new()),
            tx: Some(tx),
        };
        (store, rx)
    }

    /// Returns `None` if the store was created without notifications.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<SnapshotUpdate>> {
        self.tx.as_ref().map(broadcast::Sender::subscribe)
    }

    /// Replace the snapshot for its category, returning the previous one.
    pub fn publish(&self, snapshot: Snapshot) -> Option<Arc<Snapshot>> {
        self.install(Arc::new(snapshot))
    }

    /// Build and publish a snapshot from a pass outcome stamped now.
    pub fn publish_outcome(&self, category: &str, outcome: PassOutcome) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::new(category, outcome, Utc::now()));
        self.install(Arc::clone(&snapshot));
        snapshot
    }

    fn install(&self, snapshot: Arc<Snapshot>) -> Option<Arc<Snapshot>> {
        let update = SnapshotUpdate {
            category: snapshot.category.clone(),
            markets: snapshot.markets.len(),
        };
        let previous = self
            .snapshots
            .write()
            .insert(update.category.clone(), snapshot);

        info!(category = %update.category, markets = update.markets, "snapshot published");
        if let Some(ref tx) = self.tx {
            // No receivers is fine.
            let _ = tx.send(update);
        }
        previous
    }

    /// Current snapshot for a category.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<Arc<Snapshot>> {
        self.snapshots.read().get(&category_key(category)).cloned()
    }

    /// Categories with a published snapshot, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.snapshots.read().keys().cloned().collect()
    }

    /// Drop a category's snapshot.
    pub fn remove(&self, category: &str) -> Option<Arc<Snapshot>> {
        self.snapshots.write().remove(&category_key(category))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}
