//! Buy-In Tracker Snapshot Store
//!
//! Published ledgers are kept as immutable snapshots under opaque
//! identifiers. Callers depend on the [`SnapshotStore`] trait only; the
//! process wires in a concrete store at start-up.
//!
//! # Example
//!
//! ```rust,ignore
//! use buyin_snapshot::{InMemorySnapshotStore, SnapshotStore};
//!
//! let store = InMemorySnapshotStore::new();
//! let id = store.publish(ledger.state().clone()).await?;
//! let shared = store.retrieve(&id).await?;
//! ```

pub mod store;
pub mod memory;

pub use store::{Snapshot, SnapshotStore, StoreStats};
pub use memory::{InMemorySnapshotStore, SharedSnapshotStore, SnapshotStoreConfig};
