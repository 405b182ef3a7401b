//! Client-side persistence of ledger state.
//!
//! State is loaded once when a [`TrackedLedger`] opens and saved after every
//! mutation that changed it. Loading never fails: a missing, unreadable or
//! malformed payload yields the empty state.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use buyin_common::{LedgerState, Result};

use crate::engine::Ledger;

/// Where a client keeps its ledger between sessions.
pub trait StateStore {
    /// Load the stored state, falling back to the empty state.
    fn load(&self) -> LedgerState;

    /// Replace the stored state.
    fn save(&self, state: &LedgerState) -> Result<()>;
}

/// Decode a stored payload, degrading to the empty state on any problem.
pub fn decode_state(payload: &str) -> LedgerState {
    let state: LedgerState = match serde_json::from_str(payload) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "Stored ledger state is malformed, starting empty");
            return LedgerState::default();
        }
    };

    if let Err(e) = state.validate() {
        warn!(error = %e, "Stored ledger state is invalid, starting empty");
        return LedgerState::default();
    }

    state
}

/// JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store state at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> LedgerState {
        match fs::read_to_string(&self.path) {
            Ok(payload) => {
                let state = decode_state(&payload);
                info!(
                    path = %self.path.display(),
                    players = state.players.len(),
                    buy_ins = state.buy_in_count(),
                    "Ledger state loaded"
                );
                state
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved ledger state");
                LedgerState::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read ledger state, starting empty");
                LedgerState::default()
            }
        }
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        let payload = serde_json::to_string_pretty(state)?;

        // Write then rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "Ledger state saved");
        Ok(())
    }
}

/// In-process store holding the raw serialized payload.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    payload: RefCell<Option<String>>,
    saves: RefCell<usize>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `payload`, valid or not.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: RefCell::new(Some(payload.into())),
            saves: RefCell::new(0),
        }
    }

    /// Raw payload currently stored.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }

    /// Number of saves performed.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> LedgerState {
        match self.payload.borrow().as_deref() {
            Some(payload) => decode_state(payload),
            None => LedgerState::default(),
        }
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        *self.payload.borrow_mut() = Some(serde_json::to_string(state)?);
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// A ledger bound to a [`StateStore`]: every state change is saved.
#[derive(Debug)]
pub struct TrackedLedger<S: StateStore> {
    ledger: Ledger,
    store: S,
}

impl<S: StateStore> TrackedLedger<S> {
    /// Load the stored state and start tracking changes.
    pub fn open(store: S) -> Self {
        let ledger = Ledger::from_state(store.load());
        Self { ledger, store }
    }

    /// Read access to the ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a mutation and save if it changed the state.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut Ledger) -> T) -> Result<T> {
        let before = self.ledger.revision();
        let out = f(&mut self.ledger);
        if self.ledger.revision() != before {
            self.store.save(self.ledger.state())?;
        }
        Ok(out)
    }
}
