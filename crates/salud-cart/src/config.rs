//! Cart configuration.

use std::path::Path;

use salud_observability::{LogFormat, LogLevel, StructuredLogger};
use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// Storage key the storefront has always used for the cart snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "rudesalud_cart_v1";

/// Cart configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Where the snapshot is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CartConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self, CartError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON config.
    pub fn from_json_str(content: &str) -> Result<Self, CartError> {
        serde_json::from_str(content).map_err(|e| CartError::Config(e.to_string()))
    }

    /// Save config to a file, in the format implied by its extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CartError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content).map_err(|e| {
            CartError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })
    }

    /// Build the logger described by the `logging` section.
    pub fn logger(&self) -> StructuredLogger {
        StructuredLogger::new("cart")
            .with_min_level(self.logging.level)
            .with_format(self.logging.format)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Storage slot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key holding the JSON snapshot.
    #[serde(default = "default_key")]
    pub key: String,

    /// Named key-value store (Spin backend only).
    #[serde(default = "default_store")]
    pub store: String,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_store() -> String {
    "default".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            store: default_store(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level written.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage.key, "rudesalud_cart_v1");
        assert_eq!(config.storage.store, "default");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CartConfig::from_toml_str("").unwrap();
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = CartConfig::from_toml_str(
            r#"
            [storage]
            key = "cart_test"

            [logging]
            level = "debug"
            format = "human"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.key, "cart_test");
        assert_eq!(config.storage.store, "default");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Human);
    }

    #[test]
    fn test_json_config() {
        let config =
            CartConfig::from_json_str(r#"{"logging":{"level":"warn"}}"#).unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_bad_level_is_config_error() {
        let result = CartConfig::from_toml_str("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(CartError::Config(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("salud-cart-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut config = CartConfig::default();
        config.storage.key = "saved_key".to_string();

        for name in ["cart.toml", "cart.json"] {
            let path = dir.join(name);
            config.save(&path).unwrap();
            assert_eq!(CartConfig::load(&path).unwrap(), config);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = CartConfig::load("/definitely/not/here/cart.toml");
        assert!(matches!(result, Err(CartError::Config(_))));
    }

    #[test]
    fn test_logger_follows_config() {
        let mut config = CartConfig::default();
        config.logging.level = LogLevel::Error;
        let logger = config.logger();
        assert_eq!(logger.component(), "cart");
        assert!(!logger.enabled(LogLevel::Warn));
    }
}
