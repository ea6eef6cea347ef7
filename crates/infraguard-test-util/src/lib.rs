//! Shared test utilities for the infraguard workspace.
//!
//! `xtask` needs these at runtime (not behind `#[cfg(test)]`), so they live in their own crate.

use serde_json::Value;

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` only when the root object is a
///    report envelope (`schema`, `tool`, `verdict`, `violations`, `data`). Nested objects with
///    the same shape inside a violation's `data` are left alone.
/// 2. **Recursive**: `started_at` and `finished_at` become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "violations", "data"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("name")
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

/// Replace every violation `fingerprint` with `"__FINGERPRINT__"`.
///
/// Fingerprints are deterministic, but hand-written golden files should not pin the hash.
pub fn redact_fingerprints(mut value: Value) -> Value {
    if let Some(violations) = value.get_mut("violations").and_then(Value::as_array_mut) {
        for v in violations {
            if let Some(obj) = v.as_object_mut()
                && obj.contains_key("fingerprint")
            {
                obj.insert(
                    "fingerprint".to_string(),
                    Value::String("__FINGERPRINT__".to_string()),
                );
            }
        }
    }
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
