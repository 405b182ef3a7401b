//! Identifier types for published snapshots.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters used for generated snapshot identifiers (base 36).
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Default length of a generated snapshot identifier.
pub const DEFAULT_ID_LENGTH: usize = 6;

/// Opaque identifier of a published snapshot.
///
/// Identifiers are short random base-36 tokens. Uniqueness is best-effort;
/// callers must not derive meaning from the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Wrap an existing identifier (e.g. taken from a URL path).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draw a random identifier of `length` base-36 characters.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Self {
        let id = (0..length)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the identifier is something a URL path segment can carry.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= 64
            && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SnapshotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SnapshotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
