//! Deep merge for settings trees.
//!
//! Layering combines whole trees, not individual keys: the persisted option
//! is merged over the defaults, and later layers poke single leaves.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// Objects are merged key by key, recursing where both sides hold an object.
/// In every other case the overlay value replaces the base value wholesale,
/// including an object being replaced by a scalar or the other way around.
/// The merge is not commutative: `deep_merge(a, b) != deep_merge(b, a)` in
/// general.
///
/// # Example
/// ```
/// use serde_json::json;
/// use optstack::settings::deep_merge;
///
/// let base = json!({ "debug": { "enabled": false, "log_level": "error" } });
/// let overlay = json!({ "debug": { "log_level": "warning" } });
/// let merged = deep_merge(base, overlay);
/// assert_eq!(
///     merged,
///     json!({ "debug": { "enabled": false, "log_level": "warning" } })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge a sequence of values in order, later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_wins_on_shared_keys() {
        let base = json!({"a": 1, "b": 2});
        let overlay = json!({"b": 3, "c": 4});
        assert_eq!(deep_merge(base, overlay), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn nested_objects_merge_recursively() {
        let base = json!({
            "debug": {"enabled": false, "log_level": "error"},
            "performance": {"cache_blocks": true}
        });
        let overlay = json!({"debug": {"log_level": "warning"}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({
                "debug": {"enabled": false, "log_level": "warning"},
                "performance": {"cache_blocks": true}
            })
        );
    }

    #[test]
    fn untouched_sibling_keys_survive() {
        let base = json!({"security": {"rate_limit": true, "max_requests": 100}});
        let overlay = json!({"security": {"max_requests": 50}});
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["security"]["rate_limit"], json!(true));
        assert_eq!(merged["security"]["max_requests"], json!(50));
    }

    #[test]
    fn scalar_replaces_object_wholesale() {
        let base = json!({"debug": {"enabled": false}});
        let overlay = json!({"debug": "off"});
        assert_eq!(deep_merge(base, overlay), json!({"debug": "off"}));
    }

    #[test]
    fn object_replaces_scalar_wholesale() {
        let base = json!({"debug": "off"});
        let overlay = json!({"debug": {"enabled": true}});
        assert_eq!(deep_merge(base, overlay), json!({"debug": {"enabled": true}}));
    }

    #[test]
    fn merge_with_self_is_identity() {
        let tree = json!({
            "debug": {"enabled": false, "log_level": "error"},
            "features": {"blocks_enabled": true}
        });
        assert_eq!(deep_merge(tree.clone(), tree.clone()), tree);
    }

    #[test]
    fn merge_all_folds_in_order() {
        let layers = vec![
            json!({"a": 1}),
            json!({"b": 2}),
            json!({"a": 3, "c": 4}),
        ];
        assert_eq!(deep_merge_all(layers), json!({"a": 3, "b": 2, "c": 4}));
    }

    #[test]
    fn deeply_nested_leaves_merge() {
        let base = json!({"l1": {"l2": {"l3": {"a": 1, "b": 2}}}});
        let overlay = json!({"l1": {"l2": {"l3": {"b": 3, "c": 4}}}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"l1": {"l2": {"l3": {"a": 1, "b": 3, "c": 4}}}})
        );
    }
}
