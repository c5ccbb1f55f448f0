//! Typed settings schema.
//!
//! The canonical state is the schemaless [`SettingsTree`](super::SettingsTree);
//! this module is the validated view over it, one struct per category. Every
//! field carries a serde default so partial trees deserialize cleanly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::tree::SettingsTree;

/// Severity for the settings-driven debug logger.
///
/// Ordering is by severity: `Error` is the most severe and the default
/// threshold, `Debug` the least. An entry passes the filter when its level
/// is at or above the configured threshold's severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Error,
    Warning,
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warning" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Debug and diagnostics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSettings {
    /// Master switch for diagnostics output.
    #[serde(default)]
    pub enabled: bool,

    /// Minimum severity written by the debug logger.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Write debug entries to files in the log directory.
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,

    /// Mirror debug entries into the option store.
    #[serde(default)]
    pub log_to_db: bool,

    /// Retention cap for debug log files.
    #[serde(default = "default_max_log_files")]
    pub max_log_files: u32,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            log_level: LogLevel::default(),
            log_to_file: default_log_to_file(),
            log_to_db: false,
            max_log_files: default_max_log_files(),
        }
    }
}

fn default_log_to_file() -> bool {
    true
}

fn default_max_log_files() -> u32 {
    10
}

/// Performance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSettings {
    /// Cache rendered blocks.
    #[serde(default = "default_true")]
    pub cache_blocks: bool,

    /// Block cache lifetime in seconds.
    #[serde(default = "default_cache_duration")]
    pub cache_duration: u64,

    /// Serve minified assets.
    #[serde(default = "default_true")]
    pub minify_assets: bool,

    /// Lazy-load heavy front-end assets.
    #[serde(default = "default_true")]
    pub lazy_load: bool,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            cache_blocks: true,
            cache_duration: default_cache_duration(),
            minify_assets: true,
            lazy_load: true,
        }
    }
}

fn default_cache_duration() -> u64 {
    3600 // 1 hour
}

/// Security settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// Enforce request rate limiting.
    #[serde(default = "default_true")]
    pub rate_limit: bool,

    /// Requests allowed per time window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Rate-limit window in seconds.
    #[serde(default = "default_time_window")]
    pub time_window: u64,

    /// Reject rather than coerce suspicious input.
    #[serde(default = "default_true")]
    pub strict_validation: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            rate_limit: true,
            max_requests: default_max_requests(),
            time_window: default_time_window(),
            strict_validation: true,
        }
    }
}

fn default_max_requests() -> u32 {
    100
}

fn default_time_window() -> u64 {
    3600 // 1 hour
}

/// Feature toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesSettings {
    #[serde(default = "default_true")]
    pub blocks_enabled: bool,

    #[serde(default = "default_true")]
    pub rest_api_enabled: bool,

    #[serde(default = "default_true")]
    pub cli_enabled: bool,

    #[serde(default = "default_true")]
    pub admin_dashboard: bool,
}

impl Default for FeaturesSettings {
    fn default() -> Self {
        Self {
            blocks_enabled: true,
            rest_api_enabled: true,
            cli_enabled: true,
            admin_dashboard: true,
        }
    }
}

/// Database housekeeping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Run periodic storage optimization.
    #[serde(default)]
    pub auto_optimize: bool,

    /// Purge old debug log records.
    #[serde(default = "default_true")]
    pub cleanup_logs: bool,

    /// Days to keep log records before cleanup.
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            auto_optimize: false,
            cleanup_logs: true,
            log_retention_days: default_log_retention_days(),
        }
    }
}

fn default_log_retention_days() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

/// The full typed settings schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub debug: DebugSettings,

    #[serde(default)]
    pub performance: PerformanceSettings,

    #[serde(default)]
    pub security: SecuritySettings,

    #[serde(default)]
    pub features: FeaturesSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl Settings {
    /// The defaults as a tree, the base layer of every load.
    pub fn default_tree() -> SettingsTree {
        Settings::default().to_tree()
    }

    /// Serialize into a settings tree.
    pub fn to_tree(&self) -> SettingsTree {
        match serde_json::to_value(self) {
            Ok(value) => SettingsTree::from_value(value).unwrap_or_default(),
            Err(err) => {
                // Serializing a plain struct of scalars cannot realistically
                // fail; degrade to an empty tree rather than panic.
                warn!(error = %err, "failed to serialize settings schema");
                SettingsTree::new()
            }
        }
    }

    /// Build the typed view from a tree.
    ///
    /// Categories that fail to deserialize (a leaf of the wrong type, a
    /// category replaced by a scalar) fall back to their defaults with a
    /// warning; the raw tree is left untouched. Unknown extra keys are
    /// ignored.
    pub fn from_tree(tree: &SettingsTree) -> Self {
        let value = tree.to_value();
        match serde_json::from_value::<Settings>(value.clone()) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "settings tree does not match schema; \
                       recovering category by category");
                Self::from_categories(&value)
            }
        }
    }

    fn from_categories(value: &Value) -> Self {
        fn category<T: Default + for<'de> Deserialize<'de>>(value: &Value, name: &str) -> T {
            match value.get(name) {
                Some(raw) => match serde_json::from_value::<T>(raw.clone()) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        warn!(category = name, error = %err,
                              "malformed settings category; using defaults");
                        T::default()
                    }
                },
                None => T::default(),
            }
        }

        Settings {
            debug: category(value, "debug"),
            performance: category(value, "performance"),
            security: category(value, "security"),
            features: category(value, "features"),
            database: category(value, "database"),
        }
    }
}
