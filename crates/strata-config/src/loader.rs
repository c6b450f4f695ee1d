//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_core::StrataError;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Environment variable selecting the environment overlay file.
pub const ENVIRONMENT_VAR: &str = "STRATA_ENVIRONMENT";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Untracked local overrides
    /// 4. Environment variables such as `STRATA_REDIS__URL`
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, StrataError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config_dir = config_dir.into();
        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        let config = load_config(&config_dir, &environment)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, StrataError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The previous configuration stays in place when the new one fails
    /// to load or validate.
    pub async fn reload(&self) -> Result<(), StrataError> {
        let environment = self.config.read().await.app.environment.clone();
        let new_config = load_config(&self.config_dir, &environment)?;
        *self.config.write().await = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Gets a specific configuration value by dotted key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Builds and validates the configuration for one environment.
pub fn load_config(config_dir: &Path, environment: &str) -> Result<AppConfig, StrataError> {
    info!(environment = %environment, dir = %config_dir.display(), "Loading configuration");

    let mut builder = Config::builder()
        .set_override("app.environment", environment)
        .map_err(config_error_to_strata_error)?;

    for name in ["default", environment, "local"] {
        let path = config_dir.join(format!("{name}.toml"));
        if path.exists() {
            debug!("Loading config layer from: {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("STRATA")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(config_error_to_strata_error)?;

    ConfigValidator::validate(&app_config)
        .map_err(|errors| StrataError::Configuration(format_validation_errors(&errors)))?;

    Ok(app_config)
}

fn config_error_to_strata_error(err: ConfigError) -> StrataError {
    StrataError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), "test").unwrap();

        assert_eq!(config.app.environment, "test");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.local_absolute_secs, 600);
        assert_eq!(config.cache.local_sliding_secs, 600);
        assert_eq!(config.cache.remote_read_ttl_secs, 30);
        assert_eq!(config.cache.remote_write_ttl_secs, 1800);
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "default.toml",
            "[server]\nport = 9000\n\n[cache]\nremote_read_ttl_secs = 45\n",
        );
        write(&dir, "staging.toml", "[server]\nport = 9100\n");

        let config = load_config(dir.path(), "staging").unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.cache.remote_read_ttl_secs, 45);
        // Untouched keys in a partially specified section keep their defaults.
        assert_eq!(config.cache.remote_write_ttl_secs, 1800);
    }

    #[test]
    fn test_local_file_applies_last() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[redis]\nkey_prefix = \"a:\"\n");
        write(&dir, "local.toml", "[redis]\nkey_prefix = \"b:\"\n");

        let config = load_config(dir.path(), "development").unwrap();
        assert_eq!(config.redis.key_prefix, "b:");
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[cache]\nlocal_max_entries = 0\n");

        let err = load_config(dir.path(), "development").unwrap_err();
        assert!(matches!(err, StrataError::Configuration(ref m) if m.contains("local_max_entries")));
    }

    #[tokio::test]
    async fn test_get_value_by_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[cache]\nlocal_max_entries = 42\n");

        let loader = ConfigLoader::new(dir.path()).unwrap();
        assert_eq!(loader.get_value::<usize>("cache.local_max_entries").await, Some(42));
        assert_eq!(loader.get_value::<u64>("cache.missing").await, None);
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[server]\nport = 9000\n");
        let loader = ConfigLoader::new(dir.path()).unwrap();
        assert_eq!(loader.get().await.server.port, 9000);

        write(&dir, "default.toml", "[server]\nport = 9001\n");
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.server.port, 9001);
    }
}
