//! Shared test utilities for the stackguard workspace.
//!
//! Lives outside `#[cfg(test)]` because both the CLI integration tests and `xtask` use it.

use serde_json::Value;

pub const VERSION_PLACEHOLDER: &str = "__VERSION__";
pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";

/// Normalize the fields of a report envelope that change between runs.
///
/// Only the root envelope is touched (`tool.version`, `run.started_at`, `run.ended_at`,
/// `run.duration_ms`). Violation `data` payloads are arbitrary resource values and stay as
/// they are, even when they contain keys with the same names.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let is_envelope = ["schema", "tool", "run", "verdict", "violations"]
        .iter()
        .all(|k| obj.contains_key(*k));
    if !is_envelope {
        return value;
    }

    if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert("version".to_string(), Value::from(VERSION_PLACEHOLDER));
    }

    if let Some(run) = obj.get_mut("run").and_then(Value::as_object_mut) {
        for key in ["started_at", "ended_at"] {
            if run.contains_key(key) {
                run.insert(key.to_string(), Value::from(TIMESTAMP_PLACEHOLDER));
            }
        }
        if run.contains_key("duration_ms") {
            run.insert("duration_ms".to_string(), Value::from(0));
        }
    }

    value
}
