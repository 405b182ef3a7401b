//! In-memory snapshot store.

use async_trait::async_trait;
use buyin_common::{LedgerState, Result, SnapshotId, TrackerError, DEFAULT_ID_LENGTH};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::store::{Snapshot, SnapshotStore, StoreStats};

/// Configuration for the in-memory store.
#[derive(Debug, Clone)]
pub struct SnapshotStoreConfig {
    /// Maximum number of snapshots; publishing beyond it fails, also under
    /// concurrent publishes.
    pub max_entries: usize,
    /// Length of generated identifiers.
    pub id_length: usize,
    /// Fresh identifiers drawn before giving up on a collision streak.
    pub max_id_attempts: usize,
}

impl Default for SnapshotStoreConfig {
    fn default() -> Self {
        Self {
            max_entries: 100_000,
            id_length: DEFAULT_ID_LENGTH,
            max_id_attempts: 8,
        }
    }
}

/// Thread-safe snapshot store living for the lifetime of the process.
/// No eviction, no TTL.
pub struct InMemorySnapshotStore {
    snapshots: DashMap<SnapshotId, Snapshot>,
    /// Slots claimed by stored or in-flight publishes; never above
    /// `max_entries`.
    reserved: AtomicUsize,
    config: SnapshotStoreConfig,
}

impl InMemorySnapshotStore {
    /// Create a store with default configuration.
    pub fn new() -> Self {
        Self::with_config(SnapshotStoreConfig::default())
    }

    /// Create a store with custom configuration.
    pub fn with_config(config: SnapshotStoreConfig) -> Self {
        Self {
            snapshots: DashMap::new(),
            reserved: AtomicUsize::new(0),
            config,
        }
    }

    /// Get the number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if no snapshot was published yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn draw_id(&self) -> SnapshotId {
        SnapshotId::generate(&mut rand::thread_rng(), self.config.id_length)
    }

    /// Claim a slot for one more snapshot.
    fn reserve_slot(&self) -> Result<()> {
        let max = self.config.max_entries;
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| {
                warn!(capacity = max, "Snapshot store full");
                TrackerError::Storage(format!("snapshot store is full ({} entries)", max))
            })
    }

    fn insert(&self, state: LedgerState) -> Result<SnapshotId> {
        self.reserve_slot()?;

        for attempt in 1..=self.config.max_id_attempts {
            let id = self.draw_id();
            match self.snapshots.entry(id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Snapshot::new(id.clone(), state));
                    return Ok(id);
                }
                Entry::Occupied(_) => {
                    debug!(snapshot_id = %id, attempt, "Snapshot id collision");
                }
            }
        }

        self.reserved.fetch_sub(1, Ordering::AcqRel);
        warn!(
            attempts = self.config.max_id_attempts,
            "Could not allocate a unique snapshot id"
        );
        Err(TrackerError::Storage(
            "could not allocate a unique snapshot id".to_string(),
        ))
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn publish(&self, state: LedgerState) -> Result<SnapshotId> {
        let players = state.players.len();
        let id = self.insert(state)?;
        info!(snapshot_id = %id, players, "Snapshot published");
        Ok(id)
    }

    async fn retrieve(&self, id: &SnapshotId) -> Result<Option<LedgerState>> {
        match self.snapshots.get(id) {
            Some(snapshot) => {
                debug!(
                    snapshot_id = %id,
                    published_at = %snapshot.published_at,
                    "Snapshot retrieved"
                );
                Ok(Some(snapshot.state.clone()))
            }
            None => {
                debug!(snapshot_id = %id, "Snapshot not found");
                Ok(None)
            }
        }
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self.snapshots.len(),
            capacity: self.config.max_entries,
        }
    }
}

/// Shared snapshot store.
pub type SharedSnapshotStore = Arc<dyn SnapshotStore>;
