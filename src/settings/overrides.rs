//! Constant and environment-variable override layers.
//!
//! Both layers touch a fixed, small set of leaves. They are plain structs so
//! hosts and tests can construct them directly; the `from_*` constructors
//! probe the build or process environment.

use serde_json::Value;

use super::cast::cast_value;
use super::tree::SettingsTree;

/// Build-time constant overrides, the third layer.
///
/// Each populated field overwrites exactly one leaf. Values are fixed when
/// the host binary is compiled (`option_env!`), the nearest analog of a
/// deploy-time configuration constant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticOverrides {
    /// Overrides `debug.enabled`.
    pub debug_enabled: Option<bool>,
    /// Overrides `debug.log_level`.
    pub log_level: Option<String>,
    /// Overrides `performance.cache_blocks`.
    pub cache_blocks: Option<bool>,
    /// Overrides `performance.cache_duration`.
    pub cache_duration: Option<i64>,
    /// Overrides `security.rate_limit`.
    pub rate_limit: Option<bool>,
}

impl StaticOverrides {
    /// Read the overrides baked into this build.
    pub fn from_build_env() -> Self {
        Self {
            debug_enabled: option_env!("OPTSTACK_CONST_DEBUG").map(const_bool),
            log_level: option_env!("OPTSTACK_CONST_LOG_LEVEL").map(str::to_string),
            cache_blocks: option_env!("OPTSTACK_CONST_CACHE_BLOCKS").map(const_bool),
            cache_duration: option_env!("OPTSTACK_CONST_CACHE_DURATION")
                .and_then(|raw| raw.parse().ok()),
            rate_limit: option_env!("OPTSTACK_CONST_RATE_LIMIT").map(const_bool),
        }
    }

    /// Poke each populated override into the tree.
    pub fn apply(&self, tree: &mut SettingsTree) {
        if let Some(enabled) = self.debug_enabled {
            tree.set("debug.enabled", Value::Bool(enabled));
        }
        if let Some(level) = &self.log_level {
            tree.set("debug.log_level", Value::String(level.clone()));
        }
        if let Some(cache) = self.cache_blocks {
            tree.set("performance.cache_blocks", Value::Bool(cache));
        }
        if let Some(duration) = self.cache_duration {
            tree.set("performance.cache_duration", Value::Number(duration.into()));
        }
        if let Some(limit) = self.rate_limit {
            tree.set("security.rate_limit", Value::Bool(limit));
        }
    }
}

fn const_bool(raw: &str) -> bool {
    matches!(cast_value(raw), Value::Bool(true))
}

/// Process environment variable overrides, the fourth layer.
///
/// Raw strings as read from the environment; casting happens at apply time
/// so the mapping and the cast stay independently testable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvValues {
    /// `OPTSTACK_DEBUG` → `debug.enabled`
    pub debug: Option<String>,
    /// `OPTSTACK_LOG_LEVEL` → `debug.log_level`
    pub log_level: Option<String>,
    /// `OPTSTACK_CACHE_BLOCKS` → `performance.cache_blocks`
    pub cache_blocks: Option<String>,
    /// `OPTSTACK_RATE_LIMIT` → `security.rate_limit`
    pub rate_limit: Option<String>,
}

impl EnvValues {
    /// Read the four override variables from the process environment.
    pub fn from_process_env() -> Self {
        Self {
            debug: std::env::var("OPTSTACK_DEBUG").ok(),
            log_level: std::env::var("OPTSTACK_LOG_LEVEL").ok(),
            cache_blocks: std::env::var("OPTSTACK_CACHE_BLOCKS").ok(),
            rate_limit: std::env::var("OPTSTACK_RATE_LIMIT").ok(),
        }
    }

    /// Cast and poke each present variable into the tree.
    pub fn apply(&self, tree: &mut SettingsTree) {
        let mapping = [
            (&self.debug, "debug.enabled"),
            (&self.log_level, "debug.log_level"),
            (&self.cache_blocks, "performance.cache_blocks"),
            (&self.rate_limit, "security.rate_limit"),
        ];
        for (raw, path) in mapping {
            if let Some(raw) = raw {
                tree.set(path, cast_value(raw));
            }
        }
    }
}
