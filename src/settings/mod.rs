//! Layered settings store.
//!
//! Combines hardcoded defaults with four override layers (persisted option,
//! build-time constants, environment variables, environment-type forcing)
//! into one tree with dotted-path access, and persists the tree to a
//! key-value [`OptionStore`](crate::options::OptionStore).
//!
//! There is no global instance: the host constructs a [`SettingsStore`] via
//! [`SettingsLoader`] and threads it to consumers.

mod cast;
mod environment;
mod form;
mod loader;
mod merge;
mod overrides;
mod tree;
mod types;

pub use cast::cast_value;
pub use environment::{EnvironmentType, HostEnvironment};
pub use form::{apply_updates, UnknownPathBehavior};
pub use loader::{SettingsLoader, OPTION_KEY};
pub use merge::{deep_merge, deep_merge_all};
pub use overrides::{EnvValues, StaticOverrides};
pub use tree::SettingsTree;
pub use types::{
    DatabaseSettings, DebugSettings, FeaturesSettings, LogLevel, PerformanceSettings,
    SecuritySettings, Settings,
};

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::options::OptionStore;

/// The loaded settings: one fully layered tree plus everything needed to
/// persist and rebuild it.
///
/// `get`/`set` operate on the in-memory tree only; `save` flushes the whole
/// tree to the option store; `reset` deletes the persisted record and
/// re-runs the layering. None of these operations panic or propagate errors:
/// reads degrade to defaults and `save` reports failure as `false`.
pub struct SettingsStore {
    tree: SettingsTree,
    store: Arc<dyn OptionStore>,
    statics: StaticOverrides,
    env: EnvValues,
    host: HostEnvironment,
}

impl SettingsStore {
    pub(crate) fn from_parts(
        tree: SettingsTree,
        store: Arc<dyn OptionStore>,
        statics: StaticOverrides,
        env: EnvValues,
        host: HostEnvironment,
    ) -> Self {
        Self {
            tree,
            store,
            statics,
            env,
            host,
        }
    }

    /// Load with every layer probed from the running process: build-time
    /// constants, the four override variables, and the detected host
    /// environment.
    pub fn detect(store: Arc<dyn OptionStore>) -> Self {
        SettingsLoader::new(store)
            .with_static_overrides(StaticOverrides::from_build_env())
            .with_env_values(EnvValues::from_process_env())
            .with_host_environment(HostEnvironment::detect())
            .load()
    }

    /// Look up a value by dotted path.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.tree.get(path).cloned()
    }

    /// Look up a value by dotted path, falling back to `default`.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.tree.get_or(path, default)
    }

    /// Boolean convenience over [`get`](Self::get).
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.tree
            .get(path)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Integer convenience over [`get`](Self::get).
    pub fn get_i64(&self, path: &str, default: i64) -> i64 {
        self.tree
            .get(path)
            .and_then(Value::as_i64)
            .unwrap_or(default)
    }

    /// String convenience over [`get`](Self::get).
    pub fn get_str(&self, path: &str, default: &str) -> String {
        self.tree
            .get(path)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Set a value by dotted path, auto-vivifying intermediate mappings.
    ///
    /// Mutates the in-memory tree only; call [`save`](Self::save) to
    /// persist.
    pub fn set(&mut self, path: &str, value: Value) {
        self.tree.set(path, value);
    }

    /// Persist the full tree under [`OPTION_KEY`].
    ///
    /// Returns `false` only when the store rejected the write (logged);
    /// writing an unchanged value counts as success.
    pub fn save(&self) -> bool {
        match self.store.write(OPTION_KEY, &self.tree.to_value()) {
            Ok(changed) => {
                info!(changed, "settings saved");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to persist settings");
                false
            }
        }
    }

    /// Delete the persisted record and rebuild from defaults plus the
    /// constant/env/environment layers.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.delete(OPTION_KEY) {
            warn!(error = %err, "failed to delete persisted settings");
        }
        self.tree = loader::build_tree(&*self.store, &self.statics, &self.env, &self.host);
        info!("settings reset to defaults");
    }

    /// The full tree.
    pub fn tree(&self) -> &SettingsTree {
        &self.tree
    }

    /// The full tree as a JSON value.
    pub fn snapshot(&self) -> Value {
        self.tree.to_value()
    }

    /// The validated typed view. Malformed categories fall back to their
    /// defaults; see [`Settings::from_tree`].
    pub fn typed(&self) -> Settings {
        Settings::from_tree(&self.tree)
    }

    /// The host environment signals this store was loaded with.
    pub fn host(&self) -> &HostEnvironment {
        &self.host
    }

    /// Whether the host classifies as a development deployment.
    pub fn is_development(&self) -> bool {
        self.host.is_development()
    }

    /// Whether the host classifies as a production deployment.
    pub fn is_production(&self) -> bool {
        self.host.is_production()
    }

    /// Whether the host classifies as a staging deployment.
    pub fn is_staging(&self) -> bool {
        self.host.is_staging()
    }
}
