//! Type casting for string-valued overrides.
//!
//! Environment variables and CLI arguments arrive as strings; stored
//! settings are typed. The casting rules match common truthy/falsy spellings
//! before falling back to numeric and string interpretation.

use serde_json::Value;

/// Cast an override string to a typed JSON value.
///
/// - `true`, `1`, `on`, `yes` (case-insensitive) → `true`
/// - `false`, `0`, `off`, `no` (case-insensitive) → `false`
/// - numeric with a decimal point → f64
/// - other numeric → i64
/// - anything else → the string unchanged
pub fn cast_value(raw: &str) -> Value {
    let lowered = raw.to_ascii_lowercase();
    if matches!(lowered.as_str(), "true" | "1" | "on" | "yes") {
        return Value::Bool(true);
    }
    if matches!(lowered.as_str(), "false" | "0" | "off" | "no") {
        return Value::Bool(false);
    }

    if raw.contains('.') {
        if let Ok(float) = raw.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Value::Number(number);
            }
        }
    } else if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }

    Value::String(raw.to_string())
}
