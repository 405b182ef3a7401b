//! Buy-In Tracker Common Types
//!
//! This crate contains the types shared by the ledger, the snapshot store,
//! the HTTP service and the command-line client: the ledger data model,
//! snapshot identifiers, amount helpers and the error type.

pub mod identifiers;
pub mod monetary;
pub mod state;
pub mod error;

pub use identifiers::*;
pub use monetary::*;
pub use state::*;
pub use error::*;
