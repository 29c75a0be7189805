//! Shared test utilities for the stackguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `stackguard-types` would not suffice.

use serde_json::Value;

const TIMESTAMP_KEYS: [&str; 2] = ["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Two concerns are handled separately:
///
/// 1. **Root-only**: `tool.version` is replaced with `"__VERSION__"` only
///    when the *root* object looks like a report envelope (has all five keys
///    `schema`, `tool`, `verdict`, `findings`, `data`). Finding `data`
///    payloads may carry arbitrary objects and are never touched.
///
/// 2. **Recursive**: `started_at` and `finished_at` are normalized at any
///    depth because their placeholder value cannot collide with real data.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "findings", "data"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
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

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
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
