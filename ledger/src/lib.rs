//! Buy-In Tracker Ledger
//!
//! Owns the players and their buy-ins, computes derived totals and the
//! suggested big blind, and keeps the state persisted on the client.

pub mod engine;
pub mod totals;
pub mod denomination;
pub mod persistence;
pub mod view;

pub use engine::{Ledger, Outcome, SkipReason};
pub use totals::{LedgerSummary, MethodTotals};
pub use denomination::{round_to_allowed_denomination, DenominationSet};
pub use persistence::{FileStateStore, MemoryStateStore, StateStore, TrackedLedger};
pub use view::{EntryLine, PlayerSection, ReadOnlyView};
