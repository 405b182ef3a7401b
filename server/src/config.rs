//! Server configuration.

use buyin_common::DEFAULT_ID_LENGTH;
use buyin_snapshot::SnapshotStoreConfig;

/// Shortest generated identifier accepted by configuration.
pub const MIN_ID_LENGTH: usize = 4;

/// Longest generated identifier accepted by configuration.
pub const MAX_ID_LENGTH: usize = 32;

/// Snapshot storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Maximum number of snapshots kept in memory.
    pub max_snapshots: usize,
    /// Length of generated snapshot identifiers.
    pub id_length: usize,
    /// Identifier draws per publish before giving up on collisions.
    pub max_id_attempts: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_snapshots: 100_000,
            id_length: DEFAULT_ID_LENGTH,
            max_id_attempts: 8,
        }
    }
}

impl From<&StorageConfig> for SnapshotStoreConfig {
    fn from(config: &StorageConfig) -> Self {
        SnapshotStoreConfig {
            max_entries: config.max_snapshots,
            id_length: config.id_length,
            max_id_attempts: config.max_id_attempts,
        }
    }
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Public base URL used to build share links.
    pub public_url: String,
    /// Snapshot storage configuration.
    pub storage: StorageConfig,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 3000,
            public_url: "http://localhost:3000".to_string(),
            storage: StorageConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("TRACKER_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("TRACKER_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(url) = std::env::var("TRACKER_PUBLIC_URL") {
            config.public_url = url;
        }

        if let Ok(max) = std::env::var("TRACKER_MAX_SNAPSHOTS") {
            if let Ok(max) = max.parse() {
                config.storage.max_snapshots = max;
            }
        }

        if let Ok(len) = std::env::var("TRACKER_ID_LENGTH") {
            if let Ok(len) = len.parse() {
                config.storage.id_length = len;
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.public_url.is_empty() {
            return Err("Public URL cannot be empty".to_string());
        }

        if self.storage.max_snapshots == 0 {
            return Err("Snapshot capacity cannot be 0".to_string());
        }

        if !(MIN_ID_LENGTH..=MAX_ID_LENGTH).contains(&self.storage.id_length) {
            return Err(format!(
                "Identifier length must be between {} and {}",
                MIN_ID_LENGTH, MAX_ID_LENGTH
            ));
        }

        if self.storage.max_id_attempts == 0 {
            return Err("Identifier attempts cannot be 0".to_string());
        }

        Ok(())
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Link under which a snapshot's read-only page is shared.
    pub fn share_link(&self, id: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ServerConfig::default();
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.storage.id_length = 2;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.storage.max_snapshots = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_share_link() {
        let mut config = ServerConfig::default();
        config.public_url = "https://poker.example.com/".to_string();
        assert_eq!(config.share_link("k3x9qa"), "https://poker.example.com/k3x9qa");
    }

    #[test]
    fn test_storage_config_conversion() {
        let storage = StorageConfig {
            max_snapshots: 10,
            id_length: 8,
            max_id_attempts: 3,
        };
        let store_config = SnapshotStoreConfig::from(&storage);
        assert_eq!(store_config.max_entries, 10);
        assert_eq!(store_config.id_length, 8);
        assert_eq!(store_config.max_id_attempts, 3);
    }
}
