//! Client configuration.

use std::path::PathBuf;

use buyin_ledger::DenominationSet;

/// Command-line client configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// File holding the local ledger.
    pub state_path: PathBuf,
    /// Base URL of the snapshot server.
    pub server_url: String,
    /// Candidate blind sizes for the big blind suggestion.
    pub denominations: DenominationSet,
    /// Log level.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("poker_buy_ins.json"),
            server_url: "http://localhost:3000".to_string(),
            denominations: DenominationSet::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("TRACKER_STATE_PATH") {
            config.state_path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("TRACKER_SERVER_URL") {
            config.server_url = url;
        }

        if let Ok(list) = std::env::var("TRACKER_BLIND_DENOMINATIONS") {
            if let Ok(set) = list.parse() {
                config.denominations = set;
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        state_path: Option<PathBuf>,
        server_url: Option<String>,
        denominations: Option<DenominationSet>,
    ) -> Self {
        if let Some(path) = state_path {
            self.state_path = path;
        }
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(set) = denominations {
            self.denominations = set;
        }
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.state_path.as_os_str().is_empty() {
            return Err("State path cannot be empty".to_string());
        }

        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(format!(
                "Server URL must start with http:// or https://: {}",
                self.server_url
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.state_path, PathBuf::from("poker_buy_ins.json"));
    }

    #[test]
    fn test_overrides() {
        let set: DenominationSet = "0.5,1".parse().unwrap();
        let config = CliConfig::default().with_overrides(
            Some(PathBuf::from("/tmp/game.json")),
            None,
            Some(set),
        );

        assert_eq!(config.state_path, PathBuf::from("/tmp/game.json"));
        assert_eq!(config.server_url, "http://localhost:3000");
        assert_eq!(config.denominations.candidates(), &[dec!(0.5), dec!(1)]);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = CliConfig::default();
        config.server_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.state_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
