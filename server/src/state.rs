//! Shared application state.

use std::sync::Arc;

use buyin_snapshot::{InMemorySnapshotStore, SharedSnapshotStore, SnapshotStoreConfig};

use crate::config::ServerConfig;
use crate::metrics::{Metrics, SharedMetrics};

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot storage, created once at start-up.
    pub store: SharedSnapshotStore,
    /// Request counters.
    pub metrics: SharedMetrics,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state around an explicit store.
    pub fn new(config: ServerConfig, store: SharedSnapshotStore) -> Self {
        Self {
            store,
            metrics: Arc::new(Metrics::new()),
            config: Arc::new(config),
        }
    }

    /// Build state with the in-memory store sized by `config`.
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = InMemorySnapshotStore::with_config(SnapshotStoreConfig::from(&config.storage));
        Self::new(config, Arc::new(store))
    }
}
