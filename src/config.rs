//! Application-level configuration loading: storage backend, seeding and import placeholders.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::games::ImportPlaceholders;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DUGOUT_BACK_CONFIG_PATH";
/// Where the JSON file backend keeps the league when no path is configured.
const DEFAULT_DATA_PATH: &str = "data/league.json";
/// Capacity of the public SSE broadcast channel.
const DEFAULT_SSE_CAPACITY: usize = 64;

/// Storage backend selected at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Process-local maps, lost on restart.
    Memory,
    /// Single JSON document on disk.
    JsonFile,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    storage: StorageKind,
    data_path: PathBuf,
    seed_mock_data: bool,
    import_placeholders: ImportPlaceholders,
    sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        storage = ?app_config.storage,
                        seed = app_config.seed_mock_data,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document; omitted fields keep their defaults.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Selected storage backend.
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Location of the JSON league document.
    pub fn data_path(&self) -> &PathBuf {
        &self.data_path
    }

    /// Whether empty stores are filled with the demo club.
    pub fn seed_mock_data(&self) -> bool {
        self.seed_mock_data
    }

    /// Values used for fields missing from import rows.
    pub fn import_placeholders(&self) -> &ImportPlaceholders {
        &self.import_placeholders
    }

    /// Capacity of the public SSE broadcast channel.
    pub fn sse_capacity(&self) -> usize {
        self.sse_capacity
    }

    /// Same configuration with another storage backend, used by tests.
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::JsonFile,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            seed_mock_data: true,
            import_placeholders: ImportPlaceholders::default(),
            sse_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    storage: Option<StorageKind>,
    data_path: Option<PathBuf>,
    seed_mock_data: Option<bool>,
    #[serde(default)]
    import_placeholders: RawPlaceholders,
    sse_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
/// Placeholder overrides; each one is optional.
struct RawPlaceholders {
    opponent: Option<String>,
    location: Option<String>,
    player_name: Option<String>,
    position: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let placeholders = defaults.import_placeholders;
        let raw = value.import_placeholders;
        Self {
            storage: value.storage.unwrap_or(defaults.storage),
            data_path: value.data_path.unwrap_or(defaults.data_path),
            seed_mock_data: value.seed_mock_data.unwrap_or(defaults.seed_mock_data),
            import_placeholders: ImportPlaceholders {
                opponent: raw.opponent.unwrap_or(placeholders.opponent),
                location: raw.location.unwrap_or(placeholders.location),
                player_name: raw.player_name.unwrap_or(placeholders.player_name),
                position: raw.position.unwrap_or(placeholders.position),
            },
            sse_capacity: value
                .sse_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.sse_capacity),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = AppConfig::parse("{}").unwrap();
        assert_eq!(config.storage(), StorageKind::JsonFile);
        assert!(config.seed_mock_data());
        assert_eq!(config.import_placeholders(), &ImportPlaceholders::default());
        assert_eq!(config.sse_capacity(), DEFAULT_SSE_CAPACITY);
    }

    #[test]
    fn fields_override_defaults() {
        let config = AppConfig::parse(
            r#"{
                "storage": "memory",
                "data_path": "/tmp/club.json",
                "seed_mock_data": false,
                "import_placeholders": { "opponent": "TBD" },
                "sse_capacity": 0
            }"#,
        )
        .unwrap();

        assert_eq!(config.storage(), StorageKind::Memory);
        assert_eq!(config.data_path(), &PathBuf::from("/tmp/club.json"));
        assert!(!config.seed_mock_data());
        assert_eq!(config.import_placeholders().opponent, "TBD");
        assert_eq!(config.import_placeholders().location, "Unknown Location");
        assert_eq!(config.sse_capacity(), DEFAULT_SSE_CAPACITY);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(AppConfig::parse(r#"{ "storage": "mongo" }"#).is_err());
    }
}
