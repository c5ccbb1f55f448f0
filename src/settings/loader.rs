//! Layered construction of the settings tree.
//!
//! Layers in increasing precedence: defaults, the persisted option,
//! build-time constants, environment variables, environment-type forcing.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::environment::HostEnvironment;
use super::overrides::{EnvValues, StaticOverrides};
use super::tree::SettingsTree;
use super::types::Settings;
use super::SettingsStore;
use crate::options::OptionStore;

/// Name of the persisted option record holding the settings tree.
pub const OPTION_KEY: &str = "optstack_settings";

/// Builder that gathers the override layers and produces a [`SettingsStore`].
///
/// Every input is explicit: nothing here reads process state unless a
/// `from_*`/`detect` constructor is asked to. `new` starts from empty
/// overrides and a default host environment.
pub struct SettingsLoader {
    store: Arc<dyn OptionStore>,
    statics: StaticOverrides,
    env: EnvValues,
    host: HostEnvironment,
}

impl SettingsLoader {
    /// Start a loader over the given option store with no overrides.
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            statics: StaticOverrides::default(),
            env: EnvValues::default(),
            host: HostEnvironment::default(),
        }
    }

    /// Use the given build-time constant overrides.
    pub fn with_static_overrides(mut self, statics: StaticOverrides) -> Self {
        self.statics = statics;
        self
    }

    /// Use the given environment-variable overrides.
    pub fn with_env_values(mut self, env: EnvValues) -> Self {
        self.env = env;
        self
    }

    /// Use the given host environment signals.
    pub fn with_host_environment(mut self, host: HostEnvironment) -> Self {
        self.host = host;
        self
    }

    /// Build the layered tree and hand back the settings store.
    pub fn load(self) -> SettingsStore {
        let tree = build_tree(&*self.store, &self.statics, &self.env, &self.host);
        SettingsStore::from_parts(tree, self.store, self.statics, self.env, self.host)
    }
}

/// Run the full layering pass. Also used by `reset` to rebuild in place.
pub(super) fn build_tree(
    store: &dyn OptionStore,
    statics: &StaticOverrides,
    env: &EnvValues,
    host: &HostEnvironment,
) -> SettingsTree {
    let mut tree = Settings::default_tree();

    match store.read(OPTION_KEY) {
        Ok(Some(persisted @ Value::Object(_))) => {
            tree.merge(persisted);
            debug!("merged persisted settings over defaults");
        }
        Ok(Some(other)) => {
            warn!(
                found = %json_kind(&other),
                "persisted settings are not a mapping; discarding them"
            );
        }
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "failed to read persisted settings; using defaults");
        }
    }

    statics.apply(&mut tree);
    env.apply(&mut tree);
    apply_environment(host, &mut tree);

    tree
}

/// Force environment-specific values onto the tree.
///
/// Checks run in a fixed order and each applicable one overwrites
/// unconditionally, so when classifications overlap the later check wins for
/// the keys it touches.
fn apply_environment(host: &HostEnvironment, tree: &mut SettingsTree) {
    if host.is_development() {
        tree.set("debug.enabled", Value::Bool(true));
        tree.set("debug.log_level", Value::String("debug".into()));
        tree.set("performance.minify_assets", Value::Bool(false));
    }

    if host.is_production() {
        tree.set("debug.enabled", Value::Bool(false));
        tree.set("debug.log_level", Value::String("error".into()));
        tree.set("performance.cache_blocks", Value::Bool(true));
        tree.set("performance.minify_assets", Value::Bool(true));
    }

    if host.is_staging() {
        tree.set("debug.enabled", Value::Bool(true));
        tree.set("debug.log_level", Value::String("warning".into()));
        tree.set("performance.cache_blocks", Value::Bool(false));
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
