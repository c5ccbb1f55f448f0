//! Dotted-path access over a nested settings mapping.

use serde_json::{Map, Value};

use super::merge::deep_merge;

/// A nested settings mapping addressed by dot-notation paths.
///
/// The tree is schemaless: `get` degrades to a miss on any absent or
/// non-mapping segment, and `set` auto-vivifies missing intermediate
/// segments, so neither operation can fail. Schema validation lives in the
/// typed [`Settings`](super::Settings) view, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsTree(Map<String, Value>);

impl SettingsTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON object. Returns `None` for non-object values.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The tree as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Look up a value by dotted path.
    ///
    /// Returns `None` if any segment is missing or a non-final segment does
    /// not hold a mapping.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Look up a value by dotted path, falling back to `default` on a miss.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).cloned().unwrap_or(default)
    }

    /// Set a value by dotted path.
    ///
    /// Missing intermediate segments are created as empty mappings, and a
    /// non-mapping intermediate is replaced by an empty mapping, so the call
    /// always succeeds.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else { return };

        let mut map = &mut self.0;
        for segment in segments {
            let slot = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            map = match slot {
                Value::Object(inner) => inner,
                _ => return,
            };
        }
        map.insert(last.to_string(), value);
    }

    /// Deep-merge `overlay` into this tree, overlay values winning.
    pub fn merge(&mut self, overlay: Value) {
        let merged = deep_merge(Value::Object(std::mem::take(&mut self.0)), overlay);
        if let Value::Object(map) = merged {
            self.0 = map;
        }
    }

    /// Enumerate the dotted paths of every scalar leaf, in tree order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaves(&self.0, String::new(), &mut paths);
        paths
    }

}

fn collect_leaves(map: &Map<String, Value>, prefix: String, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => collect_leaves(inner, path, out),
            _ => out.push(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SettingsTree {
        SettingsTree::from_value(json!({
            "debug": {"enabled": false, "log_level": "error"},
            "features": {"cli_enabled": true}
        }))
        .unwrap()
    }

    #[test]
    fn get_walks_nested_segments() {
        let tree = sample();
        assert_eq!(tree.get("debug.log_level"), Some(&json!("error")));
        assert_eq!(tree.get("debug"), Some(&json!({"enabled": false, "log_level": "error"})));
    }

    #[test]
    fn get_misses_degrade_to_none() {
        let tree = sample();
        assert_eq!(tree.get("debug.missing"), None);
        assert_eq!(tree.get("nope.at.all"), None);
        // log_level is a scalar, so descending through it misses too
        assert_eq!(tree.get("debug.log_level.deeper"), None);
    }

    #[test]
    fn get_or_falls_back() {
        let tree = sample();
        assert_eq!(tree.get_or("debug.enabled", json!(true)), json!(false));
        assert_eq!(tree.get_or("debug.missing", json!("x")), json!("x"));
    }

    #[test]
    fn set_overwrites_existing_leaf() {
        let mut tree = sample();
        tree.set("debug.enabled", json!(true));
        assert_eq!(tree.get("debug.enabled"), Some(&json!(true)));
    }

    #[test]
    fn set_autovivifies_intermediate_segments() {
        let mut tree = sample();
        tree.set("custom.deep.path", json!(42));
        assert_eq!(tree.get("custom.deep.path"), Some(&json!(42)));
        // siblings untouched
        assert_eq!(tree.get("debug.enabled"), Some(&json!(false)));
    }

    #[test]
    fn set_replaces_scalar_intermediate_with_mapping() {
        let mut tree = sample();
        tree.set("debug.log_level.verbosity", json!(3));
        assert_eq!(tree.get("debug.log_level.verbosity"), Some(&json!(3)));
    }

    #[test]
    fn set_single_segment() {
        let mut tree = sample();
        tree.set("flag", json!("on"));
        assert_eq!(tree.get("flag"), Some(&json!("on")));
    }

    #[test]
    fn leaf_paths_enumerates_scalars() {
        let tree = sample();
        let paths = tree.leaf_paths();
        assert!(paths.contains(&"debug.enabled".to_string()));
        assert!(paths.contains(&"debug.log_level".to_string()));
        assert!(paths.contains(&"features.cli_enabled".to_string()));
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn merge_overlays_leaves() {
        let mut tree = sample();
        tree.merge(json!({"debug": {"log_level": "warning"}}));
        assert_eq!(tree.get("debug.log_level"), Some(&json!("warning")));
        assert_eq!(tree.get("debug.enabled"), Some(&json!(false)));
    }
}
