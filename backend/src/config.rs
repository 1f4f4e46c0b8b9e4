//! Engine configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document (or
//! no file at all) yields the stock configuration.
//!
//! ```toml
//! currency = "MAD"
//!
//! [history]
//! capacity = 50
//!
//! [accounts]
//! seed_demo_accounts = true
//! min_password_length = 8
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::costs::catalog::DEFAULT_UNIT;

/// Default number of calculations kept per session
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Default minimum password length for new accounts
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-session calculation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum entries per session; the oldest entry is evicted first
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Account registry settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccountsConfig {
    /// Seed the admin and demo accounts at startup
    pub seed_demo_accounts: bool,
    pub min_password_length: usize,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            seed_demo_accounts: true,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Currency label shown in the catalog and line details
    pub currency: String,
    pub history: HistoryConfig,
    pub accounts: AccountsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_UNIT.to_string(),
            history: HistoryConfig::default(),
            accounts: AccountsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be positive".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.currency, "MAD");
        assert_eq!(config.history.capacity, 50);
        assert!(config.accounts.seed_demo_accounts);
        assert_eq!(config.accounts.min_password_length, 8);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = EngineConfig::from_toml(
            r#"
[history]
capacity = 10
"#,
        )
        .unwrap();
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.currency, "MAD");
        assert!(config.accounts.seed_demo_accounts);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = EngineConfig::from_toml("[history]\ncapacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = EngineConfig::from_toml("currency = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency = \"EUR\"\n[accounts]\nseed_demo_accounts = false").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.currency, "EUR");
        assert!(!config.accounts.seed_demo_accounts);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = EngineConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }
}
