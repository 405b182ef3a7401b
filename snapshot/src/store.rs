//! Snapshot store trait.

use async_trait::async_trait;
use buyin_common::{LedgerState, Result, SnapshotId};
use chrono::{DateTime, Utc};

/// An immutable published copy of a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Identifier handed out at publish time.
    pub id: SnapshotId,
    /// The ledger state exactly as published.
    pub state: LedgerState,
    /// When the snapshot was stored.
    pub published_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture `state` under `id`.
    pub fn new(id: SnapshotId, state: LedgerState) -> Self {
        Self {
            id,
            state,
            published_at: Utc::now(),
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Snapshots currently held.
    pub entries: usize,
    /// Maximum number of snapshots the store accepts.
    pub capacity: usize,
}

/// Write-once key-value storage for snapshots.
///
/// There is no update or delete: a published snapshot is returned verbatim
/// for as long as the store lives.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Get the store name (used in logs).
    fn name(&self) -> &str;

    /// Store an immutable copy of `state` and return its identifier.
    async fn publish(&self, state: LedgerState) -> Result<SnapshotId>;

    /// Return the state stored under `id`, or `None` if unknown.
    async fn retrieve(&self, id: &SnapshotId) -> Result<Option<LedgerState>>;

    /// Current statistics.
    fn stats(&self) -> StoreStats;
}
