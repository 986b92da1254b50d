//! Back-office configuration.
//!
//! Loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default                               |
//! |---------------------------------|---------------------------------------|
//! | `MOSTRADOR_DB_PATH`             | platform data dir + `mostrador.db`    |
//! | `MOSTRADOR_DB_MAX_CONNECTIONS`  | `5`                                   |
//! | `MOSTRADOR_CURRENCY_SYMBOL`     | `$`                                   |
//! | `MOSTRADOR_STORE_NAME`          | `Mostrador`                           |

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use mostrador_core::Money;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Back-office configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Currency symbol for display
    pub currency_symbol: String,

    /// Store name (shown in the UI header)
    pub store_name: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup("MOSTRADOR_DB_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let max_connections = match lookup("MOSTRADOR_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("MOSTRADOR_DB_MAX_CONNECTIONS".to_string()))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(AppConfig {
            database_path,
            max_connections,
            currency_symbol: lookup("MOSTRADOR_CURRENCY_SYMBOL").unwrap_or_else(|| "$".to_string()),
            store_name: lookup("MOSTRADOR_STORE_NAME").unwrap_or_else(|| "Mostrador".to_string()),
        })
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ```rust
    /// use mostrador_backoffice::config::AppConfig;
    /// use mostrador_core::Money;
    ///
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "MOSTRADOR_DB_PATH" => Some("test.db".to_string()),
    ///     "MOSTRADOR_CURRENCY_SYMBOL" => Some("€".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.format_money(Money::from_cents(-1234)), "-€12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.major().abs(),
            amount.minor().abs()
        )
    }
}

/// `~/.local/share/mostrador/mostrador.db` on Linux, the platform
/// equivalent elsewhere.
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "mostrador", "mostrador")
        .ok_or_else(|| ConfigError::MissingRequired("MOSTRADOR_DB_PATH".to_string()))?;
    Ok(dirs.data_dir().join("mostrador.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("MOSTRADOR_DB_PATH", "/tmp/m.db")]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/m.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.store_name, "Mostrador");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("MOSTRADOR_DB_PATH", "m.db"),
            ("MOSTRADOR_DB_MAX_CONNECTIONS", " 12 "),
            ("MOSTRADOR_STORE_NAME", "Cafe Central"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.store_name, "Cafe Central");
    }

    #[test]
    fn test_invalid_pool_size() {
        for bad in ["zero", "0", "-3"] {
            let err = config(&[("MOSTRADOR_DB_PATH", "m.db"), ("MOSTRADOR_DB_MAX_CONNECTIONS", bad)])
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "MOSTRADOR_DB_MAX_CONNECTIONS"));
        }
    }

    #[test]
    fn test_format_money() {
        let config = config(&[("MOSTRADOR_DB_PATH", "m.db")]).unwrap();
        assert_eq!(config.format_money(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_money(Money::from_cents(5)), "$0.05");
        assert_eq!(config.format_money(Money::from_cents(-550)), "-$5.50");
    }
}
