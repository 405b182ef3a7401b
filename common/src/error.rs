//! Error types for the buy-in tracker.

use thiserror::Error;

/// Main error type for tracker operations.
///
/// Validation failures on ledger mutations are not errors: they are reported
/// as skipped outcomes by the ledger. This type covers addressing mistakes
/// and boundary failures.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Player index outside the player list.
    #[error("Player not found at index {index} ({count} players)")]
    PlayerNotFound { index: usize, count: usize },

    /// Buy-in index outside the player's buy-in list.
    #[error("Buy-in not found at index {index} for player {player} ({count} buy-ins)")]
    BuyInNotFound {
        player: usize,
        index: usize,
        count: usize,
    },

    /// State received from outside the ledger violates an invariant.
    #[error("Invalid ledger state: {message}")]
    InvalidState {
        message: String,
        field: Option<String>,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot storage rejected the operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network round trip to the snapshot service failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TrackerError {
    /// Check if this error came from the publish/retrieve transport rather
    /// than from the caller's input.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            TrackerError::Serialization(_)
                | TrackerError::Storage(_)
                | TrackerError::Network(_)
                | TrackerError::Io(_)
        )
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            TrackerError::PlayerNotFound { .. } => "PLAYER_NOT_FOUND",
            TrackerError::BuyInNotFound { .. } => "BUY_IN_NOT_FOUND",
            TrackerError::InvalidState { .. } => "INVALID_STATE",
            TrackerError::Serialization(_) => "SERIALIZATION_ERROR",
            TrackerError::Storage(_) => "STORAGE_ERROR",
            TrackerError::Network(_) => "NETWORK_ERROR",
            TrackerError::Io(_) => "IO_ERROR",
            TrackerError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Serialization(e.to_string())
    }
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
