//! Whitelisted path updates for form-style input.
//!
//! Dynamic `set` accepts any path; input coming from outside (CLI arguments,
//! imported files, submitted forms) is checked against the whitelist of
//! default leaves first, with a configurable policy for unknown paths.

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde_json::Value;

use super::types::Settings;
use super::SettingsStore;

/// Policy for paths outside the default schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UnknownPathBehavior {
    /// Apply silently.
    Allow,
    /// Apply but report a warning (default).
    #[default]
    Warn,
    /// Refuse the whole update batch.
    Reject,
}

/// Dotted paths of every leaf in the default schema.
pub fn known_paths() -> Vec<String> {
    Settings::default_tree().leaf_paths()
}

/// Apply a batch of path/value updates to the store under the given policy.
///
/// Returns the warnings produced for unknown paths. With
/// [`UnknownPathBehavior::Reject`] the first unknown path fails the call and
/// nothing is applied.
pub fn apply_updates(
    store: &mut SettingsStore,
    updates: &[(String, Value)],
    behavior: UnknownPathBehavior,
) -> Result<Vec<String>> {
    let known = known_paths();
    let mut warnings = Vec::new();

    for (path, _) in updates {
        if known.iter().any(|k| k == path) {
            continue;
        }
        match behavior {
            UnknownPathBehavior::Allow => {}
            UnknownPathBehavior::Warn => {
                warnings.push(format!("unknown settings path '{}'", path));
            }
            UnknownPathBehavior::Reject => {
                bail!(
                    "unknown settings path '{}'; known paths: {}",
                    path,
                    known.join(", ")
                );
            }
        }
    }

    for (path, value) in updates {
        store.set(path, value.clone());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MemoryStore;
    use crate::settings::{EnvironmentType, HostEnvironment, SettingsLoader};
    use serde_json::json;
    use std::sync::Arc;

    fn neutral_store() -> SettingsStore {
        let host = HostEnvironment {
            environment: EnvironmentType::Other,
            ..Default::default()
        };
        SettingsLoader::new(Arc::new(MemoryStore::new()))
            .with_host_environment(host)
            .load()
    }

    #[test]
    fn known_paths_cover_all_categories() {
        let paths = known_paths();
        assert!(paths.contains(&"debug.enabled".to_string()));
        assert!(paths.contains(&"database.log_retention_days".to_string()));
        assert_eq!(paths.len(), 20);
    }

    #[test]
    fn known_path_applies_without_warning() {
        let mut store = neutral_store();
        let warnings = apply_updates(
            &mut store,
            &[("debug.enabled".to_string(), json!(true))],
            UnknownPathBehavior::Warn,
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(store.get("debug.enabled"), Some(json!(true)));
    }

    #[test]
    fn warn_applies_unknown_path_and_reports() {
        let mut store = neutral_store();
        let warnings = apply_updates(
            &mut store,
            &[("custom.thing".to_string(), json!(1))],
            UnknownPathBehavior::Warn,
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(store.get("custom.thing"), Some(json!(1)));
    }

    #[test]
    fn reject_refuses_the_whole_batch() {
        let mut store = neutral_store();
        let result = apply_updates(
            &mut store,
            &[
                ("debug.enabled".to_string(), json!(true)),
                ("custom.thing".to_string(), json!(1)),
            ],
            UnknownPathBehavior::Reject,
        );
        assert!(result.is_err());
        // nothing applied
        assert_eq!(store.get("debug.enabled"), Some(json!(false)));
        assert_eq!(store.get("custom.thing"), None);
    }

    #[test]
    fn allow_is_silent() {
        let mut store = neutral_store();
        let warnings = apply_updates(
            &mut store,
            &[("custom.thing".to_string(), json!("x"))],
            UnknownPathBehavior::Allow,
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(store.get("custom.thing"), Some(json!("x")));
    }
}
