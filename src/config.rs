//! Configuration file support.
//!
//! A [`DumpConfig`] selects the dump mode and output formatting and can be
//! stored as JSON next to the other settings of the embedding application.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dump::DumpMode;
use crate::writer::DEFAULT_INDENT;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Dump configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Which document body to write
    #[serde(default)]
    pub mode: DumpMode,

    /// Spaces per nesting level
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl DumpConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            mode: DumpMode::default(),
            indent: default_indent(),
            log_level: LogLevel::default(),
        }
    }

    /// Set the dump mode.
    pub fn mode(mut self, mode: DumpMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set spaces per nesting level.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "cvat-dump.json"
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("cvat-dump").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("cvat-dump")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from the default path, falling back to defaults
    /// when the file is missing or unreadable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DumpConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.mode, DumpMode::Annotation);
        assert_eq!(config.indent, 2);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DumpConfig::new().mode(DumpMode::Interpolation).indent(4);
        let json = config.to_json().unwrap();
        assert!(json.contains(r#""mode": "cvat_interpolation""#));

        let parsed = DumpConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = DumpConfig::from_json(r#"{"version": 1, "mode": "interpolation"}"#).unwrap();
        assert_eq!(config.mode, DumpMode::Interpolation);
        assert_eq!(config.indent, 2);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_version_too_new() {
        let err = DumpConfig::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(DumpConfig::from_json(r#"{"version": 1, "mode": "coco"}"#).is_err());
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.name(), "Trace");
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("cvat-dump-config-{}", std::process::id()));
        let path = dir.join(DumpConfig::default_filename());

        let config = DumpConfig::new().mode(DumpMode::Interpolation);
        config.save(&path).unwrap();
        let loaded = DumpConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
