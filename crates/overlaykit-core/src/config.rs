//! Engine configuration.
//!
//! Tunables for the state engine and sync layer, loadable from and
//! persistable to a TOML or JSON file in the platform config directory.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of history entries retained per document.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Default sync protocol version spoken by this build.
pub const DEFAULT_SYNC_PROTOCOL_VERSION: u32 = 1;

/// Default echo-suppression window after applying a remote state, in ms.
pub const DEFAULT_ECHO_SUPPRESSION_MS: u64 = 10;

/// History-related settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of undo entries kept per document
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Sync-related settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Protocol version stamped on outbound messages
    pub protocol_version: u32,
    /// How long to suppress rebroadcasts after applying a remote state, ms
    pub echo_suppression_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_SYNC_PROTOCOL_VERSION,
            echo_suppression_ms: DEFAULT_ECHO_SUPPRESSION_MS,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl EngineConfig {
    /// Default config file path under the platform config directory.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("overlaykit")
            .join("engine.toml")
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            reason: format!("Failed to read config file: {}", e),
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
                reason: format!("Invalid JSON config: {}", e),
            })?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| ConfigError::Invalid {
                reason: format!("Invalid TOML config: {}", e),
            })?
        } else {
            return Err(ConfigError::Invalid {
                reason: "Config file must be .json or .toml".to_string(),
            }
            .into());
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when the file
    /// does not exist yet.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default engine config: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
                reason: format!("Failed to serialize config: {}", e),
            })?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
                reason: format!("Failed to serialize config: {}", e),
            })?
        } else {
            return Err(ConfigError::Invalid {
                reason: "Config file must be .json or .toml".to_string(),
            }
            .into());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                reason: format!("Failed to create config directory: {}", e),
            })?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            reason: format!("Failed to write config file: {}", e),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.history.max_entries == 0 {
            return Err(ConfigError::Invalid {
                reason: "history.max_entries must be > 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
